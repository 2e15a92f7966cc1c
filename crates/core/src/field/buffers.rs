//! Structure-of-arrays particle storage
//!
//! Three parallel `f32` arrays, laid out the way a point-sprite renderer
//! uploads them: positions (xyz), colors (rgb) and sizes. The arrays are
//! built together and only ever replaced together, so their lengths always
//! agree.

use crate::core_types::{Particle, Rgb, Vec3};
use serde::Serialize;

/// Floats per particle in the position buffer.
pub const POSITION_STRIDE: usize = 3;
/// Floats per particle in the color buffer.
pub const COLOR_STRIDE: usize = 3;

/// Per-attribute "needs re-upload" markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DirtyFlags {
    pub position: bool,
    pub color: bool,
    pub size: bool,
}

impl DirtyFlags {
    pub const ALL: DirtyFlags = DirtyFlags {
        position: true,
        color: true,
        size: true,
    };
    pub const NONE: DirtyFlags = DirtyFlags {
        position: false,
        color: false,
        size: false,
    };

    pub fn any(self) -> bool {
        self.position || self.color || self.size
    }

    /// Union of two flag sets; marks accumulate until the renderer uploads.
    pub fn merge(self, other: DirtyFlags) -> DirtyFlags {
        DirtyFlags {
            position: self.position || other.position,
            color: self.color || other.color,
            size: self.size || other.size,
        }
    }
}

/// Fixed-capacity particle arrays with index-based access.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleBuffers {
    positions: Vec<f32>,
    colors: Vec<f32>,
    sizes: Vec<f32>,
}

impl ParticleBuffers {
    /// Build `count` particles, calling `make` once per index in order.
    pub(crate) fn from_fn(count: usize, mut make: impl FnMut(usize) -> Particle) -> Self {
        let mut buffers = Self {
            positions: Vec::with_capacity(count * POSITION_STRIDE),
            colors: Vec::with_capacity(count * COLOR_STRIDE),
            sizes: Vec::with_capacity(count),
        };
        for index in 0..count {
            let particle = make(index);
            buffers
                .positions
                .extend_from_slice(particle.position.as_slice());
            buffers
                .colors
                .extend_from_slice(&particle.color.to_array());
            buffers.sizes.push(particle.size);
        }
        buffers
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    /// Height (y) of every particle, in index order.
    pub fn heights(&self) -> impl Iterator<Item = f32> + '_ {
        self.positions
            .chunks_exact(POSITION_STRIDE)
            .map(|position| position[1])
    }

    pub fn get(&self, index: usize) -> Option<Particle> {
        let size = *self.sizes.get(index)?;
        let p = index * POSITION_STRIDE;
        let c = index * COLOR_STRIDE;
        Some(Particle::new(
            Vec3::from_column_slice(&self.positions[p..p + POSITION_STRIDE]),
            Rgb::from_slice(&self.colors[c..c + COLOR_STRIDE]),
            size,
        ))
    }

    /// Overwrite one particle. Returns `false` when `index` is out of range.
    pub(crate) fn set(&mut self, index: usize, particle: &Particle) -> bool {
        if index >= self.len() {
            return false;
        }
        let p = index * POSITION_STRIDE;
        let c = index * COLOR_STRIDE;
        write_particle(
            &mut self.positions[p..p + POSITION_STRIDE],
            &mut self.colors[c..c + COLOR_STRIDE],
            &mut self.sizes[index],
            particle,
        );
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = Particle> + '_ {
        (0..self.len()).filter_map(|index| self.get(index))
    }

    /// Mutable per-particle lanes: (position xyz, color rgb, size).
    pub(crate) fn lanes_mut(
        &mut self,
    ) -> impl Iterator<Item = (&mut [f32], &mut [f32], &mut f32)> + '_ {
        self.positions
            .chunks_exact_mut(POSITION_STRIDE)
            .zip(self.colors.chunks_exact_mut(COLOR_STRIDE))
            .zip(self.sizes.iter_mut())
            .map(|((position, color), size)| (position, color, size))
    }
}

#[inline]
pub(crate) fn write_particle(
    position: &mut [f32],
    color: &mut [f32],
    size: &mut f32,
    particle: &Particle,
) {
    position.copy_from_slice(particle.position.as_slice());
    color.copy_from_slice(&particle.color.to_array());
    *size = particle.size;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(index: usize) -> Particle {
        let i = index as f32;
        Particle::new(Vec3::new(i, i + 0.5, -i), Rgb::new(1.0, 0.5, 0.25), i * 0.1)
    }

    #[test]
    fn test_layout_and_lengths() {
        let buffers = ParticleBuffers::from_fn(4, sample);
        assert_eq!(buffers.len(), 4);
        assert_eq!(buffers.positions().len(), 12);
        assert_eq!(buffers.colors().len(), 12);
        assert_eq!(buffers.sizes().len(), 4);

        // Particle 2 lives at floats 6..9
        assert_eq!(&buffers.positions()[6..9], &[2.0, 2.5, -2.0]);
        assert_eq!(&buffers.colors()[6..9], &[1.0, 0.5, 0.25]);
    }

    #[test]
    fn test_get_set() {
        let mut buffers = ParticleBuffers::from_fn(3, sample);
        assert_eq!(buffers.get(1), Some(sample(1)));
        assert_eq!(buffers.get(3), None);

        let replacement = Particle::new(Vec3::new(0.1, 4.999, 0.2), Rgb::WHITE, 1.5);
        assert!(buffers.set(2, &replacement));
        assert_eq!(buffers.get(2), Some(replacement));
        assert!(!buffers.set(3, &replacement));

        let heights: Vec<f32> = buffers.heights().collect();
        assert_eq!(heights, vec![0.5, 1.5, 4.999]);
    }

    #[test]
    fn test_lanes_cover_every_particle() {
        let mut buffers = ParticleBuffers::from_fn(5, sample);
        for (position, _, size) in buffers.lanes_mut() {
            position[1] = 1.0;
            *size = 0.0;
        }
        assert!(buffers.heights().all(|y| y == 1.0));
        assert!(buffers.sizes().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_dirty_flags() {
        assert!(!DirtyFlags::NONE.any());
        let merged = DirtyFlags::NONE.merge(DirtyFlags {
            position: true,
            ..DirtyFlags::NONE
        });
        assert!(merged.position && !merged.color && !merged.size);
        assert_eq!(merged.merge(DirtyFlags::ALL), DirtyFlags::ALL);
    }
}
