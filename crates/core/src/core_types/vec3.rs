//! Vector type alias for 3D positions.

use nalgebra::Vector3;

/// 3D vector type for particle positions.
///
/// This is a simple alias for `nalgebra::Vector3<f32>`. The field itself
/// stores positions as flat `f32` triples; `Vec3` is used wherever a single
/// particle is read or written.
pub type Vec3 = Vector3<f32>;
