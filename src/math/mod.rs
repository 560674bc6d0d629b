//! Geometry Primitives
//!
//! Pure, allocation-free helpers shared by the scene graph and the
//! manipulation gizmos:
//!
//! - [`closest_points_between_segments`]: minimum distance between two 3D segments
//! - [`Plane`] with [`intersect_segment_plane`] / [`intersect_ray_plane`]
//! - [`Ray`]: world-space picking ray, optionally unprojected from the cursor
//! - [`sign`]: three-valued sign function

pub mod plane;
pub mod ray;
pub mod segment;

pub use plane::{Plane, intersect_ray_plane, intersect_segment_plane};
pub use ray::Ray;
pub use segment::{SegmentClosestPoints, closest_points_between_segments};

/// Returns `-1.0`, `0.0` or `1.0` depending on the sign of `value`.
///
/// Unlike [`f32::signum`], zero maps to zero.
#[inline]
#[must_use]
pub fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
