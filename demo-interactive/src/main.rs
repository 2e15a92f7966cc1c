//! Interactive Fire Particle Demo
//!
//! A terminal-based debugger for the fire particle field.
//! Allows stepping frame by frame, inspecting individual particles,
//! and changing the flame parameters live.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package demo-interactive
//! ```
//!
//! # Commands
//!
//! - `step [n]` - Advance the field by n frames (default 1)
//! - `status` - Show field statistics
//! - `particle <i>` - Show one particle
//! - `top [n]` - List the n highest particles (default 10)
//! - `lift <i> <y>` - Move a particle to height y (out-of-band heights recycle next step)
//! - `count <n>` - Reallocate the field with n particles
//! - `intensity <v>` - Set fire intensity
//! - `wind <v>` - Set wind speed
//! - `respawn <uniform|ground>` - Where recycled particles re-enter
//! - `limit <d|off>` - Clamp horizontal drift to |x|, |z| <= d
//! - `reset [seed]` - Reinitialize the field, optionally with a fixed seed
//! - `help` - Show available commands
//! - `quit` - Exit the demo

use fire_particles_core::{FieldConfig, Particle, ParticleField, RespawnHeight, Vec3};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Field size used when the demo starts
const DEFAULT_PARTICLES: usize = 2000;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("╔═══════════════════════════════════════════════════════════╗");
    println!("║        Fire Particle Field - Interactive Debugger         ║");
    println!("╚═══════════════════════════════════════════════════════════╝");
    println!();

    let config = FieldConfig {
        particle_count: DEFAULT_PARTICLES,
        ..FieldConfig::default()
    };
    let mut field = match ParticleField::new(config) {
        Ok(field) => field,
        Err(e) => {
            eprintln!("Failed to create field: {}", e);
            return;
        }
    };

    println!(
        "Created field with {} particles (intensity {:.1}, wind {:.1})",
        field.len(),
        config.fire_intensity,
        config.wind_speed
    );

    // Setup readline
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Failed to create readline: {}", e);
            return;
        }
    };

    println!("\nType 'help' for available commands.\n");

    loop {
        let readline = rl.readline("fire> ");
        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                let parts: Vec<&str> = line.split_whitespace().collect();

                if parts.is_empty() {
                    continue;
                }

                match parts[0].to_lowercase().as_str() {
                    "step" | "s" => {
                        let count = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(1);
                        step_field(&mut field, count);
                    }
                    "status" | "st" => show_status(&field),
                    "particle" | "p" => {
                        if let Some(index) = parts.get(1).and_then(|s| s.parse().ok()) {
                            show_particle(&field, index);
                        } else {
                            println!("Usage: particle <index>");
                        }
                    }
                    "top" | "t" => {
                        let n = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(10);
                        show_top(&field, n);
                    }
                    "lift" | "l" => {
                        if let (Some(index), Some(y)) = (
                            parts.get(1).and_then(|s| s.parse().ok()),
                            parts.get(2).and_then(|s| s.parse().ok()),
                        ) {
                            lift_particle(&mut field, index, y);
                        } else {
                            println!("Usage: lift <index> <y>");
                        }
                    }
                    "count" | "c" => match parts.get(1).and_then(|s| s.parse().ok()) {
                        Some(count) => match field.set_particle_count(count) {
                            Ok(()) => println!(
                                "Field now holds {} particles (generation {})",
                                field.len(),
                                field.generation()
                            ),
                            Err(e) => println!("{}", e),
                        },
                        None => println!("Usage: count <n>"),
                    },
                    "intensity" | "i" => match parts.get(1).and_then(|s| s.parse().ok()) {
                        Some(value) => match field.set_fire_intensity(value) {
                            Ok(()) => println!("Fire intensity set to {:.1}", value),
                            Err(e) => println!("{}", e),
                        },
                        None => println!("Usage: intensity <value>"),
                    },
                    "wind" | "w" => match parts.get(1).and_then(|s| s.parse().ok()) {
                        Some(value) => match field.set_wind_speed(value) {
                            Ok(()) => println!("Wind speed set to {:.1}", value),
                            Err(e) => println!("{}", e),
                        },
                        None => println!("Usage: wind <value>"),
                    },
                    "respawn" | "rs" => match parts.get(1).map(|s| s.to_lowercase()).as_deref() {
                        Some("uniform") => {
                            field.set_respawn_height(RespawnHeight::Uniform);
                            println!("Recycled particles re-enter at a random height");
                        }
                        Some("ground") => {
                            field.set_respawn_height(RespawnHeight::Ground);
                            println!("Recycled particles re-enter at the base");
                        }
                        _ => println!("Usage: respawn <uniform|ground>"),
                    },
                    "limit" => set_limit(&mut field, parts.get(1).copied()),
                    "reset" | "r" => {
                        let config = *field.config();
                        let reset = match parts.get(1).and_then(|s| s.parse().ok()) {
                            Some(seed) => ParticleField::with_seed(config, seed),
                            None => ParticleField::new(config),
                        };
                        match reset {
                            Ok(new_field) => {
                                field = new_field;
                                println!("Field reset! {} fresh particles", field.len());
                            }
                            Err(e) => println!("{}", e),
                        }
                    }
                    "help" | "?" => show_help(),
                    "quit" | "q" | "exit" => {
                        println!("Goodbye!");
                        break;
                    }
                    _ => println!(
                        "Unknown command: {}. Type 'help' for available commands.",
                        parts[0]
                    ),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }
}

fn step_field(field: &mut ParticleField, count: u32) {
    println!("Stepping {} frame(s)...", count);

    for i in 0..count {
        let start = Instant::now();
        field.step();
        let time = start.elapsed();

        let respawned = field.respawns_last_step();
        if i + 1 == count || respawned > 0 {
            println!(
                "  Frame {}: Respawned: {}, Time: {}µs",
                field.frame(),
                respawned,
                time.as_micros()
            );
        }
        field.mark_uploaded();
    }
    println!("Done.");
}

fn show_status(field: &ParticleField) {
    let stats = field.stats();
    let config = field.config();
    println!("\n═══════════════ FIELD STATUS ═══════════════");
    println!("Particles:        {}", stats.particle_count);
    println!("Frame:            {}", stats.frame);
    println!("Generation:       {}", stats.generation);
    println!();
    println!("Fire intensity:   {:.1}", config.fire_intensity);
    println!("Wind speed:       {:.1}", config.wind_speed);
    println!("Respawn height:   {:?}", config.respawn_height);
    match config.horizontal_limit {
        Some(limit) => println!("Horizontal limit: {:.2}", limit),
        None => println!("Horizontal limit: off"),
    }
    println!();
    println!(
        "Height:           min {:.3}, mean {:.3}, max {:.3}",
        stats.min_height, stats.mean_height, stats.max_height
    );
    println!("Max drift:        {:.3}", stats.max_horizontal_distance);
    println!("Respawned (last): {}", stats.respawns_last_step);
    println!("Respawned (all):  {}", stats.total_respawns);
    println!("══════════════════════════════════════════════\n");
}

fn show_particle(field: &ParticleField, index: usize) {
    if let Some(p) = field.particle(index) {
        println!("\n═══════════════ PARTICLE {} ═══════════════", index);
        print_particle_details(&p);
        println!("══════════════════════════════════════════════\n");
    } else {
        println!(
            "Particle {} not found (field holds {})",
            index,
            field.len()
        );
    }
}

fn print_particle_details(p: &Particle) {
    println!(
        "Position:  ({:.3}, {:.3}, {:.3})",
        p.position.x, p.position.y, p.position.z
    );
    println!(
        "Color:     ({:.3}, {:.3}, {:.3})",
        p.color.r, p.color.g, p.color.b
    );
    println!("Size:      {:.3}", p.size);
    println!("Drift:     {:.3}", p.horizontal_distance());
}

fn show_top(field: &ParticleField, n: usize) {
    let mut particles: Vec<(usize, Particle)> = field.particles().enumerate().collect();
    particles.sort_by(|a, b| b.1.height().total_cmp(&a.1.height()));

    println!("\n═══════════════ HIGHEST PARTICLES ═══════════════");
    for (index, p) in particles.iter().take(n) {
        println!(
            "  #{:<6} y={:.3}  x={:+.3}  z={:+.3}  size={:.2}",
            index,
            p.height(),
            p.position.x,
            p.position.z,
            p.size
        );
    }
    println!("══════════════════════════════════════════════════\n");
}

fn lift_particle(field: &mut ParticleField, index: usize, y: f32) {
    let Some(mut p) = field.particle(index) else {
        println!("Particle {} not found", index);
        return;
    };

    p.position = Vec3::new(p.position.x, y, p.position.z);
    match field.set_particle(index, p) {
        Ok(()) => {
            println!("Particle {} moved to y={:.3}", index, y);
            if !(0.0..=5.0).contains(&y) {
                println!("  Outside the flame band; it will respawn on the next step.");
            }
        }
        Err(e) => println!("{}", e),
    }
}

fn set_limit(field: &mut ParticleField, arg: Option<&str>) {
    let limit = match arg {
        Some("off") => None,
        Some(s) => match s.parse::<f32>() {
            Ok(limit) => Some(limit),
            Err(_) => {
                println!("Usage: limit <distance|off>");
                return;
            }
        },
        None => {
            println!("Usage: limit <distance|off>");
            return;
        }
    };

    match field.set_horizontal_limit(limit) {
        Ok(()) => match limit {
            Some(limit) => println!("Horizontal drift clamped to {:.2}", limit),
            None => println!("Horizontal drift unbounded"),
        },
        Err(e) => println!("{}", e),
    }
}

fn show_help() {
    println!("\n═══════════════ AVAILABLE COMMANDS ═══════════════");
    println!("  step [n], s [n]       - Advance n frames (default 1)");
    println!("  status, st            - Show field statistics");
    println!("  particle <i>, p       - Show particle details");
    println!("  top [n], t            - List the n highest particles (default 10)");
    println!("  lift <i> <y>, l       - Move particle i to height y");
    println!("                          heights outside [0, 5] are recycled on the next step");
    println!("  count <n>, c          - Reallocate with n particles");
    println!("  intensity <v>, i      - Set fire intensity (upward drift)");
    println!("  wind <v>, w           - Set wind speed (horizontal jitter)");
    println!("  respawn <mode>, rs    - uniform (random height) or ground (y = 0)");
    println!("  limit <d|off>         - Clamp |x| and |z| to d, or remove the clamp");
    println!("  reset [seed], r       - Reinitialize with the current settings");
    println!("  help, ?               - Show this help");
    println!("  quit, q               - Exit");
    println!("══════════════════════════════════════════════════\n");
}
