use glam::Vec3;

const PARALLEL_EPSILON: f32 = 1e-8;

/// Result of [`closest_points_between_segments`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentClosestPoints {
    /// Parameter of `c1` along the first segment, in `[0, 1]`.
    pub s: f32,
    /// Parameter of `c2` along the second segment, in `[0, 1]`.
    pub t: f32,
    /// Closest point on the first segment.
    pub c1: Vec3,
    /// Closest point on the second segment.
    pub c2: Vec3,
    /// Euclidean distance between `c1` and `c2`.
    pub distance: f32,
}

/// Computes the closest points between segments `p1→q1` and `p2→q2`.
///
/// Degenerate (zero-length) segments are treated as points. For parallel
/// segments an arbitrary `s` is picked and `t` is solved for it, which still
/// yields the minimum distance.
#[must_use]
pub fn closest_points_between_segments(p1: Vec3, q1: Vec3, p2: Vec3, q2: Vec3) -> SegmentClosestPoints {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.length_squared();
    let e = d2.length_squared();
    let f = d2.dot(r);

    let (s, t) = if a <= PARALLEL_EPSILON && e <= PARALLEL_EPSILON {
        (0.0, 0.0)
    } else if a <= PARALLEL_EPSILON {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(r);
        if e <= PARALLEL_EPSILON {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(d2);
            let denom = a * e - b * b;

            let s = if denom.abs() > PARALLEL_EPSILON {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };

            // Re-clamp t and recompute s when the unconstrained t falls outside
            let t = (b * s + f) / e;
            if t < 0.0 {
                ((-c / a).clamp(0.0, 1.0), 0.0)
            } else if t > 1.0 {
                (((b - c) / a).clamp(0.0, 1.0), 1.0)
            } else {
                (s, t)
            }
        }
    };

    let c1 = p1 + d1 * s;
    let c2 = p2 + d2 * t;

    SegmentClosestPoints {
        s,
        t,
        c1,
        c2,
        distance: c1.distance(c2),
    }
}
