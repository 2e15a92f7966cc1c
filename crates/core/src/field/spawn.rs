//! Spawn distributions for new and recycled particles
//!
//! # Distributions
//!
//! | Attribute | Distribution |
//! |---|---|
//! | x, z | uniform in [-w, w), w = min(1, horizontal limit) |
//! | y | uniform in [0, 5) (or 0 for ground respawn) |
//! | color | HSL(0.1, 1.0, U[0.5, 1.0)) |
//! | size | uniform in [0, 2) |
//!
//! Random draws happen in the order x, y, z, lightness, size so seeded runs
//! stay reproducible across refactors.

use crate::config::RespawnHeight;
use crate::core_types::{Particle, Rgb, Vec3};
use crate::field::buffers::ParticleBuffers;
use rand::Rng;

/// Particles above this height are recycled.
pub const HEIGHT_LIMIT: f32 = 5.0;

/// Half-width of the square spawn footprint on x/z.
pub const SPAWN_HALF_WIDTH: f32 = 1.0;

/// Amber, on the unit hue wheel.
pub const FLAME_HUE: f32 = 0.1;

pub const FLAME_SATURATION: f32 = 1.0;

/// Lightness is drawn from `[MIN_LIGHTNESS, MIN_LIGHTNESS + LIGHTNESS_SPAN)`.
pub const MIN_LIGHTNESS: f32 = 0.5;
pub const LIGHTNESS_SPAN: f32 = 0.5;

/// Sizes are drawn from `[0, MAX_SIZE)`.
pub const MAX_SIZE: f32 = 2.0;

/// Samples particle attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSpawner {
    respawn_height: RespawnHeight,
    /// Never wider than the horizontal limit, so new particles start inside it
    half_width: f32,
}

impl Default for ParticleSpawner {
    fn default() -> Self {
        Self::new(RespawnHeight::default())
    }
}

impl ParticleSpawner {
    pub fn new(respawn_height: RespawnHeight) -> Self {
        Self {
            respawn_height,
            half_width: SPAWN_HALF_WIDTH,
        }
    }

    /// Shrink the spawn footprint to fit inside `limit` on x and z.
    pub fn with_horizontal_limit(mut self, limit: Option<f32>) -> Self {
        self.set_horizontal_limit(limit);
        self
    }

    pub fn respawn_height(&self) -> RespawnHeight {
        self.respawn_height
    }

    /// Half-width of the x/z footprint currently sampled.
    pub fn half_width(&self) -> f32 {
        self.half_width
    }

    pub(crate) fn set_respawn_height(&mut self, respawn_height: RespawnHeight) {
        self.respawn_height = respawn_height;
    }

    pub(crate) fn set_horizontal_limit(&mut self, limit: Option<f32>) {
        self.half_width = limit.map_or(SPAWN_HALF_WIDTH, |limit| limit.min(SPAWN_HALF_WIDTH));
    }

    /// Sample a particle for a freshly allocated field.
    pub fn spawn<R: Rng + ?Sized>(&self, rng: &mut R) -> Particle {
        let x = symmetric_unit(rng) * self.half_width;
        let y = rng.random::<f32>() * HEIGHT_LIMIT;
        let z = symmetric_unit(rng) * self.half_width;
        Self::finish(rng, Vec3::new(x, y, z))
    }

    /// Sample a replacement for a particle that left the flame.
    pub fn respawn<R: Rng + ?Sized>(&self, rng: &mut R) -> Particle {
        match self.respawn_height {
            RespawnHeight::Uniform => self.spawn(rng),
            RespawnHeight::Ground => {
                let x = symmetric_unit(rng) * self.half_width;
                let z = symmetric_unit(rng) * self.half_width;
                Self::finish(rng, Vec3::new(x, 0.0, z))
            }
        }
    }

    /// Allocate and fill a complete buffer set of `count` particles.
    pub(crate) fn populate<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> ParticleBuffers {
        ParticleBuffers::from_fn(count, |_| self.spawn(rng))
    }

    fn finish<R: Rng + ?Sized>(rng: &mut R, position: Vec3) -> Particle {
        // Upper bound stays exclusive; lightness 1.0 is pure white
        let lightness = rng.random_range(MIN_LIGHTNESS..MIN_LIGHTNESS + LIGHTNESS_SPAN);
        let color = Rgb::from_hsl(FLAME_HUE, FLAME_SATURATION, lightness);
        let size = rng.random::<f32>() * MAX_SIZE;
        Particle::new(position, color, size)
    }
}

/// Uniform sample in [-1, 1).
#[inline]
fn symmetric_unit<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    (rng.random::<f32>() - 0.5) * 2.0
}
