use glam::{Affine3A, Mat3, Mat4, Quat, Vec2, Vec3};

/// A world-space picking ray.
///
/// Hit testing and dragging must consume the same `Ray` value captured from a
/// single input sample, so the type is `Copy` and passed by value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    #[inline]
    #[must_use]
    pub const fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Builds a ray through a cursor position given in normalized device
    /// coordinates (`[-1, 1]` on both axes, +Y up).
    ///
    /// Expects a `[0, 1]` depth range projection (`Mat4::perspective_rh`).
    #[must_use]
    pub fn from_ndc(ndc: Vec2, inverse_view_projection: Mat4) -> Self {
        let near = inverse_view_projection.project_point3(ndc.extend(0.0));
        let far = inverse_view_projection.project_point3(ndc.extend(1.0));
        Self {
            origin: near,
            direction: (far - near).normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray.
    #[inline]
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Brings the ray into the space described by `world_to_local`.
    ///
    /// The origin goes through the full affine transform, the direction only
    /// through the rotation of the normal matrix. Direction length is preserved
    /// for frames built from translation, rotation and uniform scale, such as
    /// the ones `TranslationGizmo::follow_node` sets; non-uniform scale skews
    /// the extracted rotation.
    #[must_use]
    pub fn to_local(&self, world_to_local: &Affine3A) -> Self {
        let origin = world_to_local.transform_point3(self.origin);
        let normal_matrix = world_to_local.matrix3.inverse().transpose();
        let rotation = Quat::from_mat3(&Mat3::from_cols(
            Vec3::from(normal_matrix.x_axis).normalize_or_zero(),
            Vec3::from(normal_matrix.y_axis).normalize_or_zero(),
            Vec3::from(normal_matrix.z_axis).normalize_or_zero(),
        ));
        Self {
            origin,
            direction: rotation * self.direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn ndc_center_looks_down_forward_axis() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(60f32.to_radians(), 1.0, 0.1, 100.0);
        let ray = Ray::from_ndc(Vec2::ZERO, (proj * view).inverse());

        assert!(ray.direction.distance(-Vec3::Z) < EPSILON);
        assert!((ray.origin.x).abs() < EPSILON && (ray.origin.y).abs() < EPSILON);
    }

    #[test]
    fn to_local_keeps_direction_length_under_uniform_scale() {
        let world = Affine3A::from_scale_rotation_translation(
            Vec3::splat(2.5),
            Quat::from_rotation_y(0.7),
            Vec3::new(1.0, 2.0, 3.0),
        );
        let ray = Ray::new(Vec3::new(5.0, 5.0, 5.0), Vec3::new(0.0, -1.0, 0.0));
        let local = ray.to_local(&world.inverse());

        assert!((local.direction.length() - 1.0).abs() < EPSILON);
        assert!(local.origin.distance(world.inverse().transform_point3(ray.origin)) < EPSILON);
    }
}
