//! Core types and utilities

pub mod color;
pub mod particle;
pub mod vec3;

pub use color::Rgb;
pub use particle::Particle;
pub use vec3::Vec3;
