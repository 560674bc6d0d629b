use glam::{Affine3A, EulerRot, Mat3, Quat, Vec3};

/// Transform component.
///
/// Holds a node's local position, rotation and scale (TRS) together with the
/// local/world matrix caches written by the per-frame update pass.
///
/// The caches are an optimization only. [`Transform::compute_local_matrix`]
/// and [`Scene::global_transform`](crate::scene::Scene::global_transform)
/// always recompute from the TRS fields.
#[derive(Debug, Clone)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,

    pub(crate) local_matrix: Affine3A,
    pub(crate) world_matrix: Affine3A,

    // Shadow state for dirty checking
    last_position: Vec3,
    last_rotation: Quat,
    last_scale: Vec3,
    force_update: bool,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,

            local_matrix: Affine3A::IDENTITY,
            world_matrix: Affine3A::IDENTITY,

            last_position: Vec3::ZERO,
            last_rotation: Quat::IDENTITY,
            last_scale: Vec3::ONE,
            force_update: true,
        }
    }

    /// Builds a transform from explicit TRS values.
    #[must_use]
    pub fn from_trs(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
            ..Self::new()
        }
    }

    /// `translate(position) * rotate(rotation) * scale(scale)`, recomputed
    /// from scratch.
    #[inline]
    #[must_use]
    pub fn compute_local_matrix(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Refreshes the cached local matrix if any TRS field changed since the
    /// last refresh. Returns whether the cache was rewritten.
    pub fn update_local_matrix(&mut self) -> bool {
        let changed = self.position != self.last_position
            || self.rotation != self.last_rotation
            || self.scale != self.last_scale
            || self.force_update;

        if changed {
            self.local_matrix = self.compute_local_matrix();

            self.last_position = self.position;
            self.last_rotation = self.rotation;
            self.last_scale = self.scale;
            self.force_update = false;
        }

        changed
    }

    // ========================================================================
    // Euler helpers
    // ========================================================================

    /// Sets the rotation from Euler angles in degrees.
    ///
    /// Angles are applied roll (Z) first, then pitch (X), then yaw (Y), the
    /// convention used by the editor's property panels and animation curves.
    pub fn set_rotation_euler_degrees(&mut self, euler: Vec3) {
        self.rotation = quat_from_euler_degrees(euler);
    }

    /// Current rotation as Euler angles in degrees (see
    /// [`Transform::set_rotation_euler_degrees`]).
    #[must_use]
    pub fn rotation_euler_degrees(&self) -> Vec3 {
        euler_degrees_from_quat(self.rotation)
    }

    // ========================================================================
    // Getters & Helpers
    // ========================================================================

    /// Cached local matrix as of the last update pass.
    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> &Affine3A {
        &self.local_matrix
    }

    /// Cached world matrix as of the last update pass.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.world_matrix
    }

    pub(crate) fn set_world_matrix(&mut self, mat: Affine3A) {
        self.world_matrix = mat;
    }

    /// Overwrites position/rotation/scale from a matrix.
    ///
    /// Translation is the matrix's translation column, scale is the length
    /// of each basis column, and rotation is the basis with those lengths
    /// divided out. Shear is not representable and is lost.
    pub fn apply_local_matrix(&mut self, mat: &Affine3A) {
        let (scale, rotation, translation) = decompose_without_shear(mat);
        self.position = translation;
        self.rotation = rotation;
        self.scale = scale;
        self.mark_dirty();
    }

    /// Forces the next [`Transform::update_local_matrix`] to recompute.
    pub fn mark_dirty(&mut self) {
        self.force_update = true;
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.force_update
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits `mat` into (scale, rotation, translation) assuming no shear.
#[must_use]
pub fn decompose_without_shear(mat: &Affine3A) -> (Vec3, Quat, Vec3) {
    let x = Vec3::from(mat.matrix3.x_axis);
    let y = Vec3::from(mat.matrix3.y_axis);
    let z = Vec3::from(mat.matrix3.z_axis);

    let scale = Vec3::new(x.length(), y.length(), z.length());

    let basis = Mat3::from_cols(
        x.normalize_or_zero(),
        y.normalize_or_zero(),
        z.normalize_or_zero(),
    );
    let rotation = Quat::from_mat3(&basis).normalize();

    (scale, rotation, Vec3::from(mat.translation))
}

/// Euler angles in degrees (x = pitch, y = yaw, z = roll) to a unit quaternion.
#[must_use]
pub fn quat_from_euler_degrees(euler: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        euler.y.to_radians(),
        euler.x.to_radians(),
        euler.z.to_radians(),
    )
}

/// Inverse of [`quat_from_euler_degrees`].
#[must_use]
pub fn euler_degrees_from_quat(rotation: Quat) -> Vec3 {
    let (yaw, pitch, roll) = rotation.to_euler(EulerRot::YXZ);
    Vec3::new(pitch.to_degrees(), yaw.to_degrees(), roll.to_degrees())
}
