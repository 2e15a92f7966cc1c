//! Behavioral properties of the particle field: spawn ranges, the height
//! band, resizing, determinism and the degenerate rate settings.
use approx::assert_relative_eq;
use fire_particles_core::{
    FieldConfig, FieldError, Particle, ParticleField, RespawnHeight, Rgb, Vec3,
};
use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn config(count: usize, fire_intensity: f32, wind_speed: f32) -> FieldConfig {
    FieldConfig {
        particle_count: count,
        fire_intensity,
        wind_speed,
        ..FieldConfig::default()
    }
}

fn assert_in_band(field: &ParticleField) {
    for (i, p) in field.particles().enumerate() {
        assert!(
            (0.0..=5.0).contains(&p.position.y),
            "particle {i} left the flame band: y = {}",
            p.position.y
        );
    }
}

#[test]
fn test_initial_distribution() {
    let field = ParticleField::with_seed(config(5000, 50.0, 20.0), 2024).unwrap();
    assert_eq!(field.len(), 5000);

    for p in field.particles() {
        assert!((0.0..5.0).contains(&p.position.y));
        assert!((-1.0..=1.0).contains(&p.position.x));
        assert!((-1.0..=1.0).contains(&p.position.z));
        assert!((0.0..2.0).contains(&p.size));
        for channel in p.color.to_array() {
            assert!((0.0..=1.0).contains(&channel));
        }
    }

    // Uniform heights average to the middle of the flame
    let stats = field.stats();
    assert_relative_eq!(stats.mean_height, 2.5, epsilon = 0.1);
}

#[test]
fn test_height_band_holds_after_every_step() {
    let mut field = ParticleField::with_seed(config(2000, 400.0, 50.0), 7).unwrap();
    let mut saw_respawn = false;
    for _ in 0..300 {
        field.step();
        assert_in_band(&field);
        saw_respawn |= field.respawns_last_step() > 0;
    }
    assert!(saw_respawn, "high intensity should recycle particles");
    assert!(field.stats().total_respawns > 0);
}

#[test]
fn test_reinitialize_same_count() {
    let mut field = ParticleField::with_seed(config(300, 50.0, 20.0), 1).unwrap();
    field.initialize(300).unwrap();
    assert_eq!(field.len(), 300);
    field.initialize(300).unwrap();
    assert_eq!(field.len(), 300);
    assert_eq!(field.generation(), 2);
}

#[test]
fn test_count_change_replaces_everything() {
    let mut field = ParticleField::with_seed(config(1000, 50.0, 20.0), 1).unwrap();
    for _ in 0..10 {
        field.step();
    }

    field.set_particle_count(37).unwrap();
    assert_eq!(field.len(), 37);
    assert_eq!(field.buffers().positions().len(), 37 * 3);
    assert_eq!(field.buffers().colors().len(), 37 * 3);
    assert_eq!(field.buffers().sizes().len(), 37);
    assert_eq!(field.config().particle_count, 37);
    assert_eq!(field.particle(37), None);

    field.set_particle_count(2500).unwrap();
    assert_eq!(field.len(), 2500);
    assert_eq!(field.buffers().positions().len(), 2500 * 3);
    // Every particle is brand new, so all sit inside the spawn footprint
    assert!(field
        .particles()
        .all(|p| p.position.x.abs() <= 1.0 && p.position.z.abs() <= 1.0));
}

#[test]
fn test_zero_count_rejected() {
    assert_eq!(
        ParticleField::with_seed(config(0, 50.0, 20.0), 1).err(),
        Some(FieldError::InvalidParticleCount(0))
    );

    let mut field = ParticleField::with_seed(config(10, 50.0, 20.0), 1).unwrap();
    assert_eq!(
        field.set_particle_count(0),
        Err(FieldError::InvalidParticleCount(0))
    );
    assert_eq!(field.len(), 10);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let mut a = ParticleField::with_seed(config(500, 120.0, 80.0), 99).unwrap();
    let mut b = ParticleField::with_seed(config(500, 120.0, 80.0), 99).unwrap();
    let mut c = ParticleField::with_seed(config(500, 120.0, 80.0), 100).unwrap();

    for _ in 0..50 {
        a.step();
        b.step();
        c.step();
    }

    assert_eq!(a.buffers(), b.buffers());
    assert_eq!(a.stats(), b.stats());
    assert_ne!(a.buffers(), c.buffers());
}

#[test]
fn test_near_ceiling_particle() {
    for seed in 0..200 {
        let mut field = ParticleField::with_seed(config(1, 500.0, 20.0), seed).unwrap();
        let start = Particle::new(Vec3::new(0.25, 4.999, -0.25), Rgb::WHITE, 1.0);
        field.set_particle(0, start).unwrap();
        field.step();

        let p = field.particle(0).unwrap();
        if field.respawns_last_step() == 0 {
            // Drifted but stayed under the ceiling
            assert!(p.position.y >= 4.999 && p.position.y <= 5.0);
            assert!((p.position.x - 0.25).abs() <= 0.01);
            assert_eq!(p.color, Rgb::WHITE);
        } else {
            // Reborn with fresh attributes
            assert!((0.0..5.0).contains(&p.position.y));
            assert!(p.position.x.abs() <= 1.0 && p.position.z.abs() <= 1.0);
            assert!((0.0..2.0).contains(&p.size));
            assert_ne!(p.color, Rgb::WHITE);
        }
    }
}

#[test]
fn test_zero_intensity_never_rises() {
    let mut field = ParticleField::with_seed(config(400, 0.0, 20.0), 3).unwrap();
    let mut previous: Vec<f32> = field.buffers().heights().collect();
    for _ in 0..200 {
        field.step();
        let heights: Vec<f32> = field.buffers().heights().collect();
        assert_eq!(heights, previous);
        previous = heights;
    }
    assert_eq!(field.stats().total_respawns, 0);
}

#[test]
fn test_zero_wind_keeps_horizontal_position() {
    let mut field = ParticleField::with_seed(config(400, 0.0, 0.0), 4).unwrap();
    let initial: Vec<(f32, f32)> = field
        .particles()
        .map(|p| (p.position.x, p.position.z))
        .collect();

    for _ in 0..200 {
        field.step();
    }

    let after: Vec<(f32, f32)> = field
        .particles()
        .map(|p| (p.position.x, p.position.z))
        .collect();
    assert_eq!(initial, after);
}

#[test]
fn test_horizontal_drift_is_unbounded_by_default() {
    // Intensity 0 keeps particles from respawning, isolating the random walk
    let mut field = ParticleField::with_seed(config(200, 0.0, 1000.0), 5).unwrap();
    for _ in 0..2000 {
        field.step();
    }
    assert!(field.stats().max_horizontal_distance > 1.5);
}

#[test]
fn test_horizontal_limit_clamps_drift() {
    let mut field = ParticleField::with_seed(
        FieldConfig {
            horizontal_limit: Some(1.05),
            ..config(200, 0.0, 1000.0)
        },
        5,
    )
    .unwrap();
    for _ in 0..2000 {
        field.step();
    }
    for p in field.particles() {
        assert!(p.position.x.abs() <= 1.05);
        assert!(p.position.z.abs() <= 1.05);
    }
}

#[test]
fn test_ground_respawn_restarts_at_base() {
    let mut field = ParticleField::with_seed(
        FieldConfig {
            respawn_height: RespawnHeight::Ground,
            ..config(1, 0.0, 20.0)
        },
        6,
    )
    .unwrap();
    field
        .set_particle(0, Particle::new(Vec3::new(0.0, 5.5, 0.0), Rgb::WHITE, 1.0))
        .unwrap();
    field.step();
    assert_eq!(field.particle(0).unwrap().position.y, 0.0);
    assert_eq!(field.respawns_last_step(), 1);
}

#[test]
fn test_stats_serialize() {
    let mut field = ParticleField::with_seed(config(50, 50.0, 20.0), 8).unwrap();
    field.step();
    let json = serde_json::to_string(&field.stats()).unwrap();
    assert!(json.contains("\"particle_count\":50"));
    assert!(json.contains("\"frame\":1"));
    assert!(json.contains("max_horizontal_distance"));
}

#[test]
fn test_horizontal_limit_inside_spawn_footprint() {
    // Limit narrower than the [-1, 1) footprint, with heavy recycling
    let mut field = ParticleField::with_seed(
        FieldConfig {
            horizontal_limit: Some(0.5),
            ..config(2000, 500.0, 20.0)
        },
        11,
    )
    .unwrap();
    let within = |field: &ParticleField| {
        field
            .particles()
            .all(|p| p.position.x.abs() <= 0.5 && p.position.z.abs() <= 0.5)
    };
    assert!(within(&field), "fresh particles must start inside the limit");

    for _ in 0..50 {
        field.step();
        assert!(within(&field));
    }
    assert!(field.stats().total_respawns > 0);

    field.set_particle_count(700).unwrap();
    assert!(within(&field), "rebuilt field must start inside the limit");
}

#[test]
fn test_tightening_limit_pulls_particles_in() {
    let mut field = ParticleField::with_seed(config(1000, 50.0, 20.0), 12).unwrap();
    field.mark_uploaded();

    field.set_horizontal_limit(Some(0.3)).unwrap();
    assert!(field
        .particles()
        .all(|p| p.position.x.abs() <= 0.3 && p.position.z.abs() <= 0.3));
    assert!(field.dirty().position);

    field.set_particle_count(50).unwrap();
    field.step();
    assert!(field.stats().max_horizontal_distance <= 0.3 * std::f32::consts::SQRT_2 + 1e-6);
}

#[test]
fn test_non_finite_horizontal_position_is_recycled() {
    let mut field = ParticleField::with_seed(config(2, 0.0, 20.0), 13).unwrap();
    field
        .set_particle(0, Particle::new(Vec3::new(f32::NAN, 1.0, 0.0), Rgb::WHITE, 1.0))
        .unwrap();
    field
        .set_particle(
            1,
            Particle::new(Vec3::new(0.0, 1.0, f32::INFINITY), Rgb::WHITE, 1.0),
        )
        .unwrap();
    field.step();

    assert_eq!(field.respawns_last_step(), 2);
    for p in field.particles() {
        assert!(p.position.x.is_finite() && p.position.z.is_finite());
        assert!(p.position.x.abs() <= 1.0 && p.position.z.abs() <= 1.0);
    }
}
