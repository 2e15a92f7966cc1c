//! Single-particle value type
//!
//! The field never stores `Particle` values; it keeps parallel `f32` arrays.
//! This type is the unit used when reading or writing one particle by index.

use crate::core_types::{Rgb, Vec3};
use serde::{Deserialize, Serialize};

/// One point of the fire effect.
///
/// # Example
///
/// ```
/// use fire_particles_core::{Particle, Rgb, Vec3};
///
/// let spark = Particle::new(Vec3::new(0.0, 4.999, 0.0), Rgb::from_hsl(0.1, 1.0, 0.8), 1.0);
/// assert!(spark.height() < 5.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// World position; `y` is height above the fire base.
    pub position: Vec3,
    pub color: Rgb,
    /// Point size hint for the renderer. Not used by the update rule.
    pub size: f32,
}

impl Particle {
    pub fn new(position: Vec3, color: Rgb, size: f32) -> Self {
        Particle {
            position,
            color,
            size,
        }
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.position.y
    }

    /// Distance from the vertical axis through the fire base (x/z plane).
    #[inline]
    pub fn horizontal_distance(&self) -> f32 {
        self.position.x.hypot(self.position.z)
    }
}
