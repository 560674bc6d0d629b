use glam::Vec3;

/// A plane `{ p | normal · p = d }`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub d: f32,
}

impl Plane {
    #[inline]
    #[must_use]
    pub const fn new(normal: Vec3, d: f32) -> Self {
        Self { normal, d }
    }

    /// Plane with the given normal passing through `point`.
    #[inline]
    #[must_use]
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        Self { normal, d: normal.dot(point) }
    }
}

/// Intersects segment `a→b` with `plane`.
///
/// Returns the segment parameter `t ∈ [0, 1]` and the intersection point, or
/// `None` when the segment does not cross the plane (including segments
/// parallel to it).
#[must_use]
pub fn intersect_segment_plane(a: Vec3, b: Vec3, plane: Plane) -> Option<(f32, Vec3)> {
    let ab = b - a;
    let denom = plane.normal.dot(ab);
    if denom == 0.0 {
        return None;
    }

    let t = (plane.d - plane.normal.dot(a)) / denom;
    if (0.0..=1.0).contains(&t) {
        Some((t, a + ab * t))
    } else {
        None
    }
}

/// Intersects a ray with `plane`.
///
/// Returns the ray distance (in units of `dir`) and the hit point. Hits behind
/// the origin are rejected.
#[must_use]
pub fn intersect_ray_plane(origin: Vec3, dir: Vec3, plane: Plane) -> Option<(f32, Vec3)> {
    let denom = plane.normal.dot(dir);
    if denom.abs() <= f32::EPSILON {
        return None;
    }

    let t = (plane.d - plane.normal.dot(origin)) / denom;
    (t >= 0.0).then(|| (t, origin + dir * t))
}
