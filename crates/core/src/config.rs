//! Field configuration
//!
//! The three "slider" values of the effect plus two behaviors that are fixed
//! in most deployments. Validation lives here so every entry point (library
//! setters, FFI, demos) rejects the same inputs.

use crate::error::FieldError;
use serde::{Deserialize, Serialize};

/// Where a recycled particle re-enters the flame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RespawnHeight {
    /// Same distribution as initialization: y uniform in [0, 5).
    #[default]
    Uniform,
    /// Back at the base of the fire: y = 0.
    Ground,
}

/// Configuration of a [`ParticleField`](crate::ParticleField).
///
/// # Example
///
/// ```
/// use fire_particles_core::FieldConfig;
///
/// let config = FieldConfig {
///     fire_intensity: 80.0,
///     ..FieldConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// assert_eq!(config.particle_count, 5000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Number of particles; changing it rebuilds the whole field.
    pub particle_count: usize,
    /// Scales the upward drift. 500 gives up to one unit of rise per step.
    pub fire_intensity: f32,
    /// Scales the sideways jitter on x and z.
    pub wind_speed: f32,
    pub respawn_height: RespawnHeight,
    /// Clamp for |x| and |z|. `None` lets the horizontal random walk run free.
    pub horizontal_limit: Option<f32>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 5000,
            fire_intensity: 50.0,
            wind_speed: 20.0,
            respawn_height: RespawnHeight::Uniform,
            horizontal_limit: None,
        }
    }
}

impl FieldConfig {
    /// Check every field.
    ///
    /// # Errors
    /// Returns the first invalid value found, in declaration order.
    pub fn validate(&self) -> Result<(), FieldError> {
        validate_particle_count(self.particle_count)?;
        validate_fire_intensity(self.fire_intensity)?;
        validate_wind_speed(self.wind_speed)?;
        validate_horizontal_limit(self.horizontal_limit)?;
        Ok(())
    }
}

pub(crate) fn validate_particle_count(count: usize) -> Result<(), FieldError> {
    if count == 0 {
        return Err(FieldError::InvalidParticleCount(count));
    }
    Ok(())
}

pub(crate) fn validate_fire_intensity(value: f32) -> Result<(), FieldError> {
    if !value.is_finite() || value < 0.0 {
        return Err(FieldError::InvalidFireIntensity(value));
    }
    Ok(())
}

pub(crate) fn validate_wind_speed(value: f32) -> Result<(), FieldError> {
    if !value.is_finite() || value < 0.0 {
        return Err(FieldError::InvalidWindSpeed(value));
    }
    Ok(())
}

pub(crate) fn validate_horizontal_limit(limit: Option<f32>) -> Result<(), FieldError> {
    match limit {
        Some(value) if !value.is_finite() || value <= 0.0 => {
            Err(FieldError::InvalidHorizontalLimit(value))
        }
        _ => Ok(()),
    }
}
