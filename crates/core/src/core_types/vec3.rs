//! Vector type alias for 3D positions and extents.

use nalgebra::Vector3;

/// 3D vector type for world positions and bounds sizes.
///
/// This is a simple alias for `nalgebra::Vector3<f32>`, used for cell centers,
/// heat source positions and object bounds.
pub type Vec3 = Vector3<f32>;
