use glam::{Affine3A, Mat4, Quat, Vec3};
use rustc_hash::FxHashMap;
use uuid::Uuid;

use crate::animation::SkeletalAnimation;

/// One joint of a [`Skeleton`].
#[derive(Debug, Clone)]
pub struct Bone {
    pub name: String,
    /// Index of the parent bone. Parents always precede their children.
    pub parent: Option<usize>,
    pub bind_position: Vec3,
    pub bind_rotation: Quat,
    pub bind_scale: Vec3,
}

impl Bone {
    #[must_use]
    pub fn new(name: &str, parent: Option<usize>, bind_position: Vec3, bind_rotation: Quat, bind_scale: Vec3) -> Self {
        Self {
            name: name.to_string(),
            parent,
            bind_position,
            bind_rotation,
            bind_scale,
        }
    }

    fn bind_local(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.bind_scale, self.bind_rotation, self.bind_position)
    }
}

/// A bone hierarchy attached to a skinned mesh.
///
/// Bones are stored parents-first. Applying a skeletal animation walks them
/// in order, so each bone's parent pose is final before the bone itself is
/// posed.
#[derive(Debug, Clone)]
pub struct Skeleton {
    pub id: Uuid,
    pub name: String,

    bones: Vec<Bone>,
    bone_lookup: FxHashMap<String, usize>,

    // Inverse of each bone's bind-pose global matrix
    inverse_bind_matrices: Vec<Affine3A>,

    // === Runtime Data ===
    global_poses: Vec<Affine3A>,
    skin_matrices: Vec<Mat4>,
}

impl Skeleton {
    /// Builds a skeleton in its bind pose.
    ///
    /// Bones whose parent index does not precede them are treated as roots
    /// and reported through the log.
    #[must_use]
    pub fn new(name: &str, mut bones: Vec<Bone>) -> Self {
        for (index, bone) in bones.iter_mut().enumerate() {
            if let Some(parent) = bone.parent
                && parent >= index
            {
                log::warn!(
                    "Skeleton '{name}': bone '{}' references parent {parent} out of order, treating it as a root",
                    bone.name
                );
                bone.parent = None;
            }
        }

        let bone_lookup = bones
            .iter()
            .enumerate()
            .map(|(i, bone)| (bone.name.clone(), i))
            .collect();

        let mut skeleton = Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            inverse_bind_matrices: Vec::with_capacity(bones.len()),
            global_poses: vec![Affine3A::IDENTITY; bones.len()],
            skin_matrices: vec![Mat4::IDENTITY; bones.len()],
            bones,
            bone_lookup,
        };

        skeleton.pose_with(|bone| bone.bind_local());
        skeleton.inverse_bind_matrices = skeleton.global_poses.iter().map(Affine3A::inverse).collect();
        skeleton.refresh_skin_matrices();
        skeleton
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    #[must_use]
    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.bone_lookup.get(name).copied()
    }

    /// Skeleton-space matrix of bone `index` in the current pose.
    #[must_use]
    pub fn bone_global_matrix(&self, index: usize) -> Option<&Affine3A> {
        self.global_poses.get(index)
    }

    /// Per-bone skinning matrices (`bone_global * inverse_bind`), in bone order.
    #[inline]
    #[must_use]
    pub fn skin_matrices(&self) -> &[Mat4] {
        &self.skin_matrices
    }

    /// Poses every bone from `animation` at `time`. Bones the animation does
    /// not mention keep their bind pose.
    pub fn apply_animation(&mut self, animation: &SkeletalAnimation, time: f32) {
        self.pose_with(|bone| match animation.bone(&bone.name) {
            Some(bone_anim) => {
                let (position, rotation, scale) = bone_anim.sample(time);
                Affine3A::from_scale_rotation_translation(scale, rotation, position)
            }
            None => bone.bind_local(),
        });
        self.refresh_skin_matrices();
    }

    pub fn reset_to_bind_pose(&mut self) {
        self.pose_with(Bone::bind_local);
        self.refresh_skin_matrices();
    }

    fn pose_with(&mut self, local_of: impl Fn(&Bone) -> Affine3A) {
        for i in 0..self.bones.len() {
            let bone = &self.bones[i];
            let local = local_of(bone);
            self.global_poses[i] = match bone.parent {
                Some(parent) => self.global_poses[parent] * local,
                None => local,
            };
        }
    }

    fn refresh_skin_matrices(&mut self) {
        for (i, skin) in self.skin_matrices.iter_mut().enumerate() {
            *skin = (self.global_poses[i] * self.inverse_bind_matrices[i]).into();
        }
    }
}
