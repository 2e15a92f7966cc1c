//! Fire Particle Field Core Library
//!
//! A decorative point-particle fire effect. A fixed pool of colored particles
//! rises with randomized turbulence, drifts sideways with the wind, and is
//! recycled once it climbs past the flame height.
//!
//! ## Frame model
//!
//! The library does no rendering. An external driver calls
//! [`ParticleField::step`] once per frame and hands the resulting
//! [`FrameView`] to a rendering collaborator (anything implementing
//! [`FrameSink`]). [`FrameLoop`] packages that sequence.
//!
//! ```
//! use fire_particles_core::{FieldConfig, ParticleField};
//!
//! let config = FieldConfig {
//!     particle_count: 100,
//!     ..FieldConfig::default()
//! };
//! let mut field = ParticleField::with_seed(config, 7).unwrap();
//! field.step();
//!
//! let view = field.view();
//! assert_eq!(view.positions.len(), 300);
//! assert!(view.dirty.position);
//! ```

// Core types and utilities
pub mod core_types;

pub mod config;
pub mod error;
pub mod field;
pub mod frame;
pub mod stats;

// Re-export core types
pub use core_types::{Particle, Rgb, Vec3};

pub use config::{FieldConfig, RespawnHeight};
pub use error::FieldError;
pub use field::{DirtyFlags, ParticleBuffers, ParticleField, ParticleSpawner};
pub use frame::{FrameLoop, FrameSink, FrameView};
pub use stats::FieldStats;
