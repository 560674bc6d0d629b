use glam::{Affine3A, Vec3, Vec4};

use crate::gizmo::GizmoAxis;
use crate::math::{Plane, Ray, closest_points_between_segments, intersect_segment_plane, sign};
use crate::settings::GizmoSettings;

/// Length of the segment standing in for the picking ray in [`TranslationHandle::is_hit`].
pub const HIT_RAY_LENGTH: f32 = 1000.0;
/// Length of the segment intersected with the constraint planes.
pub const PLANE_RAY_LENGTH: f32 = 10_000_000.0;
/// Planes whose normal is this close to perpendicular to the ray are skipped.
pub const GRAZING_THRESHOLD: f32 = 0.1;
/// Distance along the axis used when no constraint plane can be hit.
pub const FALLBACK_DISTANCE: f32 = 10_000.0;

/// World placement of a gizmo as seen by its handles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GizmoFrame {
    /// Gizmo-to-world transform.
    pub transform: Affine3A,
    /// Uniform size factor, usually derived from the camera distance.
    pub scale: f32,
}

impl Default for GizmoFrame {
    fn default() -> Self {
        Self {
            transform: Affine3A::IDENTITY,
            scale: 1.0,
        }
    }
}

/// One axis-constrained part of a translation gizmo.
///
/// `planes` holds the normals of the two coordinate planes that contain the
/// handle's axis; picking rays are intersected with them to find where along
/// the axis the cursor is.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationHandle {
    axis: GizmoAxis,
    extent: Vec3,
    planes: [Vec3; 2],
    pub color: Vec4,
    pub handle_length: f32,
    pub handle_scale: f32,
    pub handle_radius: f32,
}

impl TranslationHandle {
    #[must_use]
    pub fn new(axis: GizmoAxis, settings: &GizmoSettings) -> Self {
        let (extent, planes) = match axis {
            GizmoAxis::X => (Vec3::X, [Vec3::Y, Vec3::Z]),
            GizmoAxis::Y => (Vec3::Y, [Vec3::X, Vec3::Z]),
            GizmoAxis::Z => (Vec3::Z, [Vec3::X, Vec3::Y]),
        };

        Self {
            axis,
            extent,
            planes,
            color: settings.axis_colors[axis.index()],
            handle_length: settings.handle_length,
            handle_scale: settings.handle_scale,
            handle_radius: settings.handle_radius,
        }
    }

    #[inline]
    #[must_use]
    pub fn axis(&self) -> GizmoAxis {
        self.axis
    }

    /// Unit direction of the handle in gizmo space.
    #[inline]
    #[must_use]
    pub fn extent(&self) -> Vec3 {
        self.extent
    }

    #[inline]
    #[must_use]
    pub fn planes(&self) -> &[Vec3; 2] {
        &self.planes
    }

    /// Hit threshold in world units: `handle_scale * gizmo_scale * handle_scale`.
    #[inline]
    #[must_use]
    pub fn hit_threshold(&self, frame: &GizmoFrame) -> f32 {
        self.handle_scale * frame.scale * self.handle_scale
    }

    /// Whether `ray` passes within [`Self::hit_threshold`] of the handle's
    /// world-space segment.
    #[must_use]
    pub fn is_hit(&self, frame: &GizmoFrame, ray: Ray) -> bool {
        let p1 = frame.transform.transform_point3(Vec3::ZERO);
        let q1 = frame
            .transform
            .transform_point3(self.extent * self.handle_length * frame.scale * self.handle_scale);

        let p2 = ray.origin;
        let q2 = ray.at(HIT_RAY_LENGTH);

        closest_points_between_segments(p1, q1, p2, q2).distance < self.hit_threshold(frame)
    }

    /// World-space point on the handle's axis under `ray`.
    ///
    /// The ray is intersected with both constraint planes in gizmo space and
    /// each intersection is projected onto the axis; the projection closest
    /// to the ray origin wins. If neither plane can be hit the point is
    /// pushed [`FALLBACK_DISTANCE`] along the axis, towards the side the ray
    /// points to.
    #[must_use]
    pub fn hit_position(&self, frame: &GizmoFrame, ray: Ray) -> Vec3 {
        let local_ray = ray.to_local(&frame.transform.inverse());
        let origin = local_ray.origin;
        let dir = local_ray.direction;

        let mut closest: Option<(f32, Vec3)> = None;

        for &plane_normal in &self.planes {
            let normal = if plane_normal.dot(origin) < 0.0 {
                -plane_normal
            } else {
                plane_normal
            };

            let Some((_, hit)) = intersect_segment_plane(origin, origin + dir * PLANE_RAY_LENGTH, Plane::new(normal, 0.0))
            else {
                continue;
            };
            if dir.dot(normal).abs() < GRAZING_THRESHOLD {
                continue;
            }

            let projected = self.extent * hit;
            let distance = origin.distance(projected);
            if closest.is_none_or(|(best, _)| distance < best) {
                closest = Some((distance, projected));
            }
        }

        let local_hit = match closest {
            Some((_, projected)) => projected,
            None => {
                let direction = sign(dir.normalize_or_zero().dot(self.extent));
                direction * self.extent * FALLBACK_DISTANCE
            }
        };

        frame.transform.transform_point3(local_hit)
    }
}
