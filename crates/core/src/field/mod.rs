//! The particle field: a fixed pool of fire particles advanced once per frame
//!
//! # Update rule
//!
//! Each [`ParticleField::step`] moves every particle independently:
//!
//! ```text
//! y += U(0,1)         * fire_intensity / 500
//! x += (U(0,1) - 0.5) * wind_speed     / 1000
//! z += (U(0,1) - 0.5) * wind_speed     / 1000
//! ```
//!
//! A particle that ends up above [`HEIGHT_LIMIT`] is respawned in place with
//! fresh position, color and size; the drifted position is discarded. There
//! is no other lifecycle state.
//!
//! With a horizontal limit set, new particles spawn inside it and every
//! particle is clamped to it at the end of each step.
//!
//! The horizontal terms are an unbiased random walk with no restoring force,
//! so x and z wander without bound on long runs unless
//! [`FieldConfig::horizontal_limit`] is set.

pub mod buffers;
pub mod spawn;

pub use buffers::{DirtyFlags, ParticleBuffers};
pub use spawn::{ParticleSpawner, HEIGHT_LIMIT};

use crate::config::{self, FieldConfig, RespawnHeight};
use crate::core_types::Particle;
use crate::error::FieldError;
use crate::frame::FrameView;
use crate::stats::FieldStats;
use buffers::write_particle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

/// Fire intensity is divided by this to get the maximum rise per step.
pub const RISE_DIVISOR: f32 = 500.0;

/// Wind speed is divided by this to get the horizontal jitter span per step.
pub const WIND_DIVISOR: f32 = 1000.0;

/// Fixed-size set of fire particles.
///
/// Owns its buffers exclusively. Renderers borrow them through
/// [`ParticleField::view`] between steps.
///
/// # Example
///
/// ```
/// use fire_particles_core::{FieldConfig, ParticleField};
///
/// let mut field = ParticleField::with_seed(FieldConfig::default(), 42).unwrap();
/// for _ in 0..60 {
///     field.step();
/// }
/// assert!(field.particles().all(|p| (0.0..=5.0).contains(&p.position.y)));
///
/// // Resizing replaces every particle
/// field.set_particle_count(250).unwrap();
/// assert_eq!(field.len(), 250);
/// ```
#[derive(Debug, Clone)]
pub struct ParticleField {
    config: FieldConfig,
    spawner: ParticleSpawner,
    buffers: ParticleBuffers,
    dirty: DirtyFlags,
    rng: StdRng,

    /// Bumped every time the buffer set is replaced
    generation: u64,
    /// Steps taken since creation
    frame: u64,

    respawns_last_step: usize,
    total_respawns: u64,
}

impl ParticleField {
    /// Create a field seeded from the operating system.
    ///
    /// # Errors
    /// Returns a [`FieldError`] if `config` fails validation.
    pub fn new(config: FieldConfig) -> Result<Self, FieldError> {
        Self::from_rng(config, StdRng::from_os_rng())
    }

    /// Create a field with a fixed seed. Identical seeds and call sequences
    /// produce bit-identical buffers.
    ///
    /// # Errors
    /// Returns a [`FieldError`] if `config` fails validation.
    pub fn with_seed(config: FieldConfig, seed: u64) -> Result<Self, FieldError> {
        Self::from_rng(config, StdRng::seed_from_u64(seed))
    }

    fn from_rng(config: FieldConfig, mut rng: StdRng) -> Result<Self, FieldError> {
        config.validate()?;

        let spawner = ParticleSpawner::new(config.respawn_height)
            .with_horizontal_limit(config.horizontal_limit);
        let buffers = spawner.populate(config.particle_count, &mut rng);

        info!(
            "Particle field created: {} particles, intensity={:.1}, wind={:.1}, respawn={:?}",
            config.particle_count, config.fire_intensity, config.wind_speed, config.respawn_height
        );

        Ok(Self {
            config,
            spawner,
            buffers,
            dirty: DirtyFlags::ALL,
            rng,
            generation: 0,
            frame: 0,
            respawns_last_step: 0,
            total_respawns: 0,
        })
    }

    /// Throw away every particle and allocate `count` fresh ones.
    ///
    /// Rebuilds even when `count` equals the current size. The new buffer set
    /// is built completely before it replaces the old one.
    ///
    /// # Errors
    /// Returns [`FieldError::InvalidParticleCount`] for `count == 0`; the
    /// field is left untouched.
    pub fn initialize(&mut self, count: usize) -> Result<(), FieldError> {
        if let Err(e) = config::validate_particle_count(count) {
            warn!("Rejected particle count: {e}");
            return Err(e);
        }

        let buffers = self.spawner.populate(count, &mut self.rng);
        self.buffers = buffers;
        self.config.particle_count = count;
        self.generation += 1;
        self.dirty = DirtyFlags::ALL;
        self.respawns_last_step = 0;

        info!(
            "Particle field reinitialized: {} particles (generation {})",
            count, self.generation
        );
        Ok(())
    }

    /// Advance every particle by one frame.
    pub fn step(&mut self) {
        let rise = self.config.fire_intensity / RISE_DIVISOR;
        let wind = self.config.wind_speed / WIND_DIVISOR;
        let limit = self.config.horizontal_limit;
        let spawner = self.spawner;
        let rng = &mut self.rng;

        let mut respawned = 0usize;
        for (position, color, size) in self.buffers.lanes_mut() {
            position[1] += rng.random::<f32>() * rise;
            position[0] += (rng.random::<f32>() - 0.5) * wind;
            position[2] += (rng.random::<f32>() - 0.5) * wind;

            // Also catches out-of-band or non-finite values from set_particle
            if !(0.0..=HEIGHT_LIMIT).contains(&position[1])
                || !position[0].is_finite()
                || !position[2].is_finite()
            {
                let particle = spawner.respawn(rng);
                write_particle(position, color, size, &particle);
                respawned += 1;
            }

            if let Some(limit) = limit {
                clamp_horizontal(position, limit);
            }
        }

        self.frame += 1;
        self.respawns_last_step = respawned;
        self.total_respawns += respawned as u64;
        self.dirty = self.dirty.merge(DirtyFlags {
            position: true,
            color: respawned > 0,
            size: respawned > 0,
        });

        debug!(
            "Particle field step: frame={}, particles={}, respawned={}",
            self.frame,
            self.buffers.len(),
            respawned
        );
    }

    /// Change the particle count, rebuilding the field if it differs.
    ///
    /// # Errors
    /// Returns [`FieldError::InvalidParticleCount`] for `count == 0`.
    pub fn set_particle_count(&mut self, count: usize) -> Result<(), FieldError> {
        if count == self.buffers.len() {
            return Ok(());
        }
        self.initialize(count)
    }

    /// # Errors
    /// Returns [`FieldError::InvalidFireIntensity`] for negative or non-finite values.
    pub fn set_fire_intensity(&mut self, fire_intensity: f32) -> Result<(), FieldError> {
        if let Err(e) = config::validate_fire_intensity(fire_intensity) {
            warn!("Rejected fire intensity: {e}");
            return Err(e);
        }
        self.config.fire_intensity = fire_intensity;
        Ok(())
    }

    /// # Errors
    /// Returns [`FieldError::InvalidWindSpeed`] for negative or non-finite values.
    pub fn set_wind_speed(&mut self, wind_speed: f32) -> Result<(), FieldError> {
        if let Err(e) = config::validate_wind_speed(wind_speed) {
            warn!("Rejected wind speed: {e}");
            return Err(e);
        }
        self.config.wind_speed = wind_speed;
        Ok(())
    }

    pub fn set_respawn_height(&mut self, respawn_height: RespawnHeight) {
        self.config.respawn_height = respawn_height;
        self.spawner.set_respawn_height(respawn_height);
    }

    /// Set or remove the clamp on |x| and |z|.
    ///
    /// A new limit applies at once: particles outside it are pulled in and
    /// the spawn footprint shrinks to fit.
    ///
    /// # Errors
    /// Returns [`FieldError::InvalidHorizontalLimit`] for zero, negative or
    /// non-finite limits.
    pub fn set_horizontal_limit(&mut self, limit: Option<f32>) -> Result<(), FieldError> {
        if let Err(e) = config::validate_horizontal_limit(limit) {
            warn!("Rejected horizontal limit: {e}");
            return Err(e);
        }
        self.config.horizontal_limit = limit;
        self.spawner.set_horizontal_limit(limit);

        if let Some(limit) = limit {
            let mut moved = false;
            for (position, _, _) in self.buffers.lanes_mut() {
                moved |= clamp_horizontal(position, limit);
            }
            if moved {
                self.dirty.position = true;
            }
        }
        Ok(())
    }

    /// Replace the whole configuration at once.
    ///
    /// The field is rebuilt only if the particle count changes.
    ///
    /// # Errors
    /// Returns the first validation error; nothing is applied in that case.
    pub fn apply_config(&mut self, config: FieldConfig) -> Result<(), FieldError> {
        if let Err(e) = config.validate() {
            warn!("Rejected field configuration: {e}");
            return Err(e);
        }

        self.set_respawn_height(config.respawn_height);
        self.config.fire_intensity = config.fire_intensity;
        self.config.wind_speed = config.wind_speed;
        self.set_horizontal_limit(config.horizontal_limit)?;
        self.set_particle_count(config.particle_count)
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn buffers(&self) -> &ParticleBuffers {
        &self.buffers
    }

    pub fn particle(&self, index: usize) -> Option<Particle> {
        self.buffers.get(index)
    }

    pub fn particles(&self) -> impl Iterator<Item = Particle> + '_ {
        self.buffers.iter()
    }

    /// Overwrite one particle in place and mark every buffer dirty.
    ///
    /// Heights outside `[0, 5]` are accepted here and recycled by the next
    /// [`step`](Self::step).
    ///
    /// # Errors
    /// Returns [`FieldError::IndexOutOfBounds`] if `index >= len()`.
    pub fn set_particle(&mut self, index: usize, particle: Particle) -> Result<(), FieldError> {
        if !self.buffers.set(index, &particle) {
            return Err(FieldError::IndexOutOfBounds {
                index,
                len: self.buffers.len(),
            });
        }
        self.dirty = DirtyFlags::ALL;
        Ok(())
    }

    /// Read-only view for the render phase of the current frame.
    pub fn view(&self) -> FrameView<'_> {
        FrameView {
            positions: self.buffers.positions(),
            colors: self.buffers.colors(),
            sizes: self.buffers.sizes(),
            dirty: self.dirty,
            generation: self.generation,
            frame: self.frame,
        }
    }

    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    /// Acknowledge that the renderer uploaded the current buffers.
    pub fn mark_uploaded(&mut self) {
        self.dirty = DirtyFlags::NONE;
    }

    pub fn respawns_last_step(&self) -> usize {
        self.respawns_last_step
    }

    pub fn stats(&self) -> FieldStats {
        FieldStats::collect(
            &self.buffers,
            self.generation,
            self.frame,
            self.respawns_last_step,
            self.total_respawns,
        )
    }
}

/// Clamp x and z of one position lane; returns whether anything moved.
#[inline]
fn clamp_horizontal(position: &mut [f32], limit: f32) -> bool {
    let (x, z) = (position[0], position[2]);
    position[0] = x.clamp(-limit, limit);
    position[2] = z.clamp(-limit, limit);
    position[0] != x || position[2] != z
}
