//! Frame driver and the rendering seam
//!
//! The field never schedules itself. Whatever owns the display cadence (a
//! window event loop, a game engine tick, a headless benchmark) calls
//! [`FrameLoop::tick`], which runs one frame:
//!
//! 1. [`ParticleField::step`]
//! 2. [`FrameSink::render`] with a read-only [`FrameView`]
//! 3. [`ParticleField::mark_uploaded`]

use crate::core_types::{Particle, Rgb, Vec3};
use crate::field::buffers::{COLOR_STRIDE, POSITION_STRIDE};
use crate::field::{DirtyFlags, ParticleField};

/// Read-only, frame-scoped view of the particle buffers.
///
/// `positions` and `colors` hold three floats per particle, `sizes` one.
/// All three always describe the same particles.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub positions: &'a [f32],
    pub colors: &'a [f32],
    pub sizes: &'a [f32],
    /// Buffers changed since the last acknowledged upload
    pub dirty: DirtyFlags,
    /// Changes whenever the buffer set was reallocated; GPU-side buffers
    /// must be recreated rather than updated
    pub generation: u64,
    pub frame: u64,
}

impl FrameView<'_> {
    #[inline]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn particle(&self, index: usize) -> Option<Particle> {
        let size = *self.sizes.get(index)?;
        let p = index * POSITION_STRIDE;
        let c = index * COLOR_STRIDE;
        Some(Particle::new(
            Vec3::from_column_slice(&self.positions[p..p + POSITION_STRIDE]),
            Rgb::from_slice(&self.colors[c..c + COLOR_STRIDE]),
            size,
        ))
    }
}

/// Rendering collaborator: receives the buffers once per frame.
pub trait FrameSink {
    fn render(&mut self, frame: &FrameView<'_>);
}

impl<F> FrameSink for F
where
    F: FnMut(&FrameView<'_>),
{
    fn render(&mut self, frame: &FrameView<'_>) {
        self(frame);
    }
}

/// Owns a field and a sink and runs frames on demand.
///
/// # Example
///
/// ```
/// use fire_particles_core::{FieldConfig, FrameLoop, FrameSink, FrameView, ParticleField};
///
/// #[derive(Default)]
/// struct Uploads(usize);
///
/// impl FrameSink for Uploads {
///     fn render(&mut self, frame: &FrameView<'_>) {
///         if frame.dirty.position {
///             self.0 += 1;
///         }
///     }
/// }
///
/// let config = FieldConfig { particle_count: 64, ..FieldConfig::default() };
/// let field = ParticleField::with_seed(config, 1).unwrap();
/// let mut frames = FrameLoop::new(field, Uploads::default());
/// frames.run(10);
/// assert_eq!(frames.frames_rendered(), 10);
/// assert_eq!(frames.sink().0, 10);
/// ```
#[derive(Debug)]
pub struct FrameLoop<S> {
    field: ParticleField,
    sink: S,
    frames_rendered: u64,
}

impl<S: FrameSink> FrameLoop<S> {
    pub fn new(field: ParticleField, sink: S) -> Self {
        Self {
            field,
            sink,
            frames_rendered: 0,
        }
    }

    /// Step, render, acknowledge.
    pub fn tick(&mut self) {
        self.field.step();
        self.sink.render(&self.field.view());
        self.field.mark_uploaded();
        self.frames_rendered += 1;
    }

    pub fn run(&mut self, frames: u64) {
        for _ in 0..frames {
            self.tick();
        }
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    /// Mutable access between frames, e.g. for configuration changes.
    pub fn field_mut(&mut self) -> &mut ParticleField {
        &mut self.field
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_parts(self) -> (ParticleField, S) {
        (self.field, self.sink)
    }
}
