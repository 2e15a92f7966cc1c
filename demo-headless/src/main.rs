use clap::{Parser, ValueEnum};
use fire_particles_core::{
    FieldConfig, FieldStats, FrameLoop, FrameSink, FrameView, ParticleField, RespawnHeight,
};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Headless fire particle demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "fire-particles-demo")]
#[command(about = "Run the fire particle field without a window", long_about = None)]
struct Args {
    /// Number of particles
    #[arg(short, long, default_value_t = 5000)]
    particles: usize,

    /// Fire intensity (upward drift scale)
    #[arg(short, long, default_value_t = 50.0)]
    intensity: f32,

    /// Wind speed (horizontal drift scale)
    #[arg(short, long, default_value_t = 20.0)]
    wind: f32,

    /// Number of frames to run
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Fixed random seed for reproducible runs
    #[arg(short, long)]
    seed: Option<u64>,

    /// Report every N frames
    #[arg(short, long, default_value_t = 60)]
    report_interval: u64,

    /// Where recycled particles re-enter the flame
    #[arg(long, value_enum, default_value_t = RespawnArg::Uniform)]
    respawn: RespawnArg,

    /// Clamp |x| and |z| to this distance (unbounded when omitted)
    #[arg(long)]
    horizontal_limit: Option<f32>,

    /// Emit one JSON object per report instead of a table
    #[arg(long)]
    json: bool,

    /// Run validation checks after the demo
    #[arg(short, long)]
    validate: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RespawnArg {
    Uniform,
    Ground,
}

impl From<RespawnArg> for RespawnHeight {
    fn from(arg: RespawnArg) -> Self {
        match arg {
            RespawnArg::Uniform => RespawnHeight::Uniform,
            RespawnArg::Ground => RespawnHeight::Ground,
        }
    }
}

/// Stands in for a GPU renderer: counts what would be uploaded each frame.
#[derive(Debug, Default)]
struct UploadCounter {
    position_uploads: u64,
    color_uploads: u64,
    size_uploads: u64,
    bytes_uploaded: u64,
    buffer_rebuilds: u64,
    last_generation: Option<u64>,
}

impl FrameSink for UploadCounter {
    fn render(&mut self, frame: &FrameView<'_>) {
        if self.last_generation != Some(frame.generation) {
            self.buffer_rebuilds += 1;
            self.last_generation = Some(frame.generation);
        }

        let float_bytes = std::mem::size_of::<f32>() as u64;
        if frame.dirty.position {
            self.position_uploads += 1;
            self.bytes_uploaded += frame.positions.len() as u64 * float_bytes;
        }
        if frame.dirty.color {
            self.color_uploads += 1;
            self.bytes_uploaded += frame.colors.len() as u64 * float_bytes;
        }
        if frame.dirty.size {
            self.size_uploads += 1;
            self.bytes_uploaded += frame.sizes.len() as u64 * float_bytes;
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = FieldConfig {
        particle_count: args.particles,
        fire_intensity: args.intensity,
        wind_speed: args.wind,
        respawn_height: args.respawn.into(),
        horizontal_limit: args.horizontal_limit,
    };

    let field = match args.seed {
        Some(seed) => ParticleField::with_seed(config, seed),
        None => ParticleField::new(config),
    };
    let field = match field {
        Ok(field) => field,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    if !args.json {
        println!("=== Fire Particle Demo ===\n");
        println!(
            "Particles: {}, Intensity: {:.1}, Wind: {:.1}, Respawn: {:?}",
            config.particle_count, config.fire_intensity, config.wind_speed, config.respawn_height
        );
        match config.horizontal_limit {
            Some(limit) => println!("Horizontal limit: {:.2}\n", limit),
            None => println!("Horizontal limit: none (free random walk)\n"),
        }
        println!("  Frame | Mean y | Max y | Max drift | Respawned | Total respawns");
        println!("--------|--------|-------|-----------|-----------|---------------");
    }
    info!("Running {} frames", args.frames);

    let mut frames = FrameLoop::new(field, UploadCounter::default());
    let report_interval = args.report_interval.max(1);

    for frame in 1..=args.frames {
        frames.tick();
        if frame % report_interval == 0 || frame == args.frames {
            report(&frames.field().stats(), args.json);
        }
    }

    let (field, uploads) = frames.into_parts();

    if !args.json {
        println!("\n=== Run Complete ===");
        println!("Frames rendered: {}", field.frame());
        println!(
            "Uploads: positions={}, colors={}, sizes={}",
            uploads.position_uploads, uploads.color_uploads, uploads.size_uploads
        );
        println!(
            "Bytes uploaded: {:.2} MiB, buffer rebuilds: {}",
            uploads.bytes_uploaded as f64 / (1024.0 * 1024.0),
            uploads.buffer_rebuilds
        );
        println!("\nHeight profile:");
        print_height_profile(&field);
    }

    if args.validate {
        return if run_validation_tests() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    ExitCode::SUCCESS
}

fn report(stats: &FieldStats, json: bool) {
    if json {
        match serde_json::to_string(stats) {
            Ok(line) => println!("{line}"),
            Err(e) => eprintln!("Failed to serialize stats: {e}"),
        }
        return;
    }
    println!(
        "{:7} | {:6.3} | {:5.3} | {:9.4} | {:9} | {:14}",
        stats.frame,
        stats.mean_height,
        stats.max_height,
        stats.max_horizontal_distance,
        stats.respawns_last_step,
        stats.total_respawns
    );
}

/// Ten half-unit bands from the base to the flame tip, as bars.
fn print_height_profile(field: &ParticleField) {
    const BANDS: usize = 10;
    const BAR_WIDTH: usize = 50;

    let mut counts = [0usize; BANDS];
    for y in field.buffers().heights() {
        let band = ((y / 5.0) * BANDS as f32) as usize;
        counts[band.min(BANDS - 1)] += 1;
    }

    let max = counts.iter().copied().max().unwrap_or(0).max(1);
    for (band, count) in counts.iter().enumerate().rev() {
        let low = band as f32 * 0.5;
        let bar = "#".repeat(count * BAR_WIDTH / max);
        println!("{:3.1}-{:3.1} | {:<width$} {}", low, low + 0.5, bar, count, width = BAR_WIDTH);
    }
}

fn run_validation_tests() -> bool {
    println!("\n=== Validation ===");
    let mut passed = true;

    let mut check = |name: &str, ok: bool| {
        println!("{} {}", if ok { "PASS" } else { "FAIL" }, name);
        passed &= ok;
    };

    let base = FieldConfig {
        particle_count: 1000,
        ..FieldConfig::default()
    };

    // Height band holds under heavy recycling
    match ParticleField::with_seed(
        FieldConfig {
            fire_intensity: 500.0,
            ..base
        },
        1,
    ) {
        Ok(mut field) => {
            let mut in_band = true;
            for _ in 0..200 {
                field.step();
                in_band &= field.buffers().heights().all(|y| (0.0..=5.0).contains(&y));
            }
            check("heights stay within [0, 5]", in_band);
        }
        Err(e) => check(&format!("heights stay within [0, 5] ({e})"), false),
    }

    // No intensity, no rise
    match ParticleField::with_seed(
        FieldConfig {
            fire_intensity: 0.0,
            ..base
        },
        2,
    ) {
        Ok(mut field) => {
            let before: Vec<f32> = field.buffers().heights().collect();
            for _ in 0..100 {
                field.step();
            }
            let after: Vec<f32> = field.buffers().heights().collect();
            check("zero intensity never raises particles", before == after);
        }
        Err(e) => check(&format!("zero intensity never raises particles ({e})"), false),
    }

    // No wind, no sideways motion
    match ParticleField::with_seed(
        FieldConfig {
            fire_intensity: 0.0,
            wind_speed: 0.0,
            ..base
        },
        3,
    ) {
        Ok(mut field) => {
            let before = field.buffers().positions().to_vec();
            for _ in 0..100 {
                field.step();
            }
            check(
                "zero wind keeps x and z fixed",
                before.as_slice() == field.buffers().positions(),
            );
        }
        Err(e) => check(&format!("zero wind keeps x and z fixed ({e})"), false),
    }

    // Resizing replaces the set
    match ParticleField::with_seed(base, 4) {
        Ok(mut field) => {
            let resized = field.set_particle_count(321).is_ok()
                && field.len() == 321
                && field.buffers().positions().len() == 963;
            check("resizing replaces the particle set", resized);
        }
        Err(e) => check(&format!("resizing replaces the particle set ({e})"), false),
    }

    check(
        "zero particles rejected",
        ParticleField::with_seed(
            FieldConfig {
                particle_count: 0,
                ..base
            },
            5,
        )
        .is_err(),
    );

    passed
}
