//! Per-frame summary statistics for reporting and diagnostics.

use crate::field::buffers::POSITION_STRIDE;
use crate::field::ParticleBuffers;
use serde::Serialize;

/// Snapshot of the field after a step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FieldStats {
    pub particle_count: usize,
    pub generation: u64,
    pub frame: u64,
    pub min_height: f32,
    pub mean_height: f32,
    pub max_height: f32,
    /// Largest distance of any particle from the vertical axis through the
    /// fire base. Grows over time when no horizontal limit is configured.
    pub max_horizontal_distance: f32,
    pub respawns_last_step: usize,
    pub total_respawns: u64,
}

impl FieldStats {
    pub(crate) fn collect(
        buffers: &ParticleBuffers,
        generation: u64,
        frame: u64,
        respawns_last_step: usize,
        total_respawns: u64,
    ) -> Self {
        let mut stats = FieldStats {
            particle_count: buffers.len(),
            generation,
            frame,
            respawns_last_step,
            total_respawns,
            ..FieldStats::default()
        };
        if buffers.is_empty() {
            return stats;
        }

        let mut min_height = f32::INFINITY;
        let mut max_height = f32::NEG_INFINITY;
        let mut height_sum = 0.0_f64;
        let mut max_horizontal = 0.0_f32;

        for position in buffers.positions().chunks_exact(POSITION_STRIDE) {
            let (x, y, z) = (position[0], position[1], position[2]);
            min_height = min_height.min(y);
            max_height = max_height.max(y);
            height_sum += f64::from(y);
            max_horizontal = max_horizontal.max(x.hypot(z));
        }

        stats.min_height = min_height;
        stats.max_height = max_height;
        stats.mean_height = (height_sum / buffers.len() as f64) as f32;
        stats.max_horizontal_distance = max_horizontal;
        stats
    }
}
