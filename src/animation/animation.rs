use std::sync::Arc;

use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::animation::tracks::KeyframeTrack;

/// How [`Animation::sample_time`] maps timeline time into the clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    /// Clamp to `[0, length]`.
    Once,
    /// Wrap modulo `length`.
    #[default]
    Loop,
    /// Play forward then backward.
    PingPong,
}

/// Keyframed node animation.
///
/// Property curves are keyed by name: `"position"` and `"scale"` hold
/// vectors, `"rotation"` holds Euler angles in degrees. An animation may
/// additionally carry skeletal data, which drives the TRS of descendant nodes
/// whose names match bone names.
#[derive(Debug, Clone)]
pub struct Animation {
    pub name: String,
    /// Clip length in seconds.
    pub length: f32,
    pub loop_mode: LoopMode,
    properties: FxHashMap<String, KeyframeTrack<Vec3>>,
    skeletal: Option<Arc<SkeletalAnimation>>,
}

impl Animation {
    #[must_use]
    pub fn new(name: &str, length: f32) -> Self {
        Self {
            name: name.to_string(),
            length,
            loop_mode: LoopMode::default(),
            properties: FxHashMap::default(),
            skeletal: None,
        }
    }

    #[must_use]
    pub fn with_loop_mode(mut self, loop_mode: LoopMode) -> Self {
        self.loop_mode = loop_mode;
        self
    }

    /// Adds or replaces the curve for `property`. The clip grows to cover
    /// the curve's last key.
    pub fn set_property_anim(&mut self, property: &str, track: KeyframeTrack<Vec3>) {
        self.length = self.length.max(track.end_time());
        self.properties.insert(property.to_string(), track);
    }

    #[must_use]
    pub fn with_property_anim(mut self, property: &str, track: KeyframeTrack<Vec3>) -> Self {
        self.set_property_anim(property, track);
        self
    }

    #[must_use]
    pub fn has_property_anim(&self, property: &str) -> bool {
        self.properties.contains_key(property)
    }

    #[must_use]
    pub fn property_anim(&self, property: &str) -> Option<&KeyframeTrack<Vec3>> {
        self.properties.get(property)
    }

    /// Samples the curve for `property` at an already remapped time.
    #[must_use]
    pub fn sample_property(&self, property: &str, time: f32) -> Option<Vec3> {
        self.properties.get(property).map(|track| track.sample(time))
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn set_skeletal_animation(&mut self, skeletal: Arc<SkeletalAnimation>) {
        self.skeletal = Some(skeletal);
    }

    #[must_use]
    pub fn with_skeletal_animation(mut self, skeletal: Arc<SkeletalAnimation>) -> Self {
        self.set_skeletal_animation(skeletal);
        self
    }

    #[must_use]
    pub fn has_skeletal_animation(&self) -> bool {
        self.skeletal.is_some()
    }

    #[must_use]
    pub fn skeletal_animation(&self) -> Option<&Arc<SkeletalAnimation>> {
        self.skeletal.as_ref()
    }

    /// Maps timeline `time` into clip time according to the loop mode.
    /// Clips without a positive length pass the time through.
    #[must_use]
    pub fn sample_time(&self, time: f32) -> f32 {
        let length = self.length;
        if length <= 0.0 {
            return time;
        }

        match self.loop_mode {
            LoopMode::Once => time.clamp(0.0, length),
            LoopMode::Loop => time.rem_euclid(length),
            LoopMode::PingPong => {
                let t = time.rem_euclid(length * 2.0);
                if t > length { length * 2.0 - t } else { t }
            }
        }
    }
}

/// Per-bone TRS curves.
#[derive(Debug, Clone)]
pub struct BoneAnimation {
    pub position: KeyframeTrack<Vec3>,
    pub rotation: KeyframeTrack<Quat>,
    pub scale: KeyframeTrack<Vec3>,
}

impl BoneAnimation {
    #[must_use]
    pub fn new(position: KeyframeTrack<Vec3>, rotation: KeyframeTrack<Quat>, scale: KeyframeTrack<Vec3>) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// `(position, rotation, scale)` at `time`.
    #[must_use]
    pub fn sample(&self, time: f32) -> (Vec3, Quat, Vec3) {
        (
            self.position.sample(time),
            self.rotation.sample(time).normalize(),
            self.scale.sample(time),
        )
    }
}

/// Bone-name keyed animation of a skeleton hierarchy.
#[derive(Debug, Clone, Default)]
pub struct SkeletalAnimation {
    pub name: String,
    bones: FxHashMap<String, BoneAnimation>,
}

impl SkeletalAnimation {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            bones: FxHashMap::default(),
        }
    }

    pub fn insert_bone(&mut self, bone_name: &str, animation: BoneAnimation) {
        self.bones.insert(bone_name.to_string(), animation);
    }

    #[must_use]
    pub fn with_bone(mut self, bone_name: &str, animation: BoneAnimation) -> Self {
        self.insert_bone(bone_name, animation);
        self
    }

    #[must_use]
    pub fn bone(&self, bone_name: &str) -> Option<&BoneAnimation> {
        self.bones.get(bone_name)
    }

    #[must_use]
    pub fn contains_bone(&self, bone_name: &str) -> bool {
        self.bones.contains_key(bone_name)
    }

    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }
}
