//! Animation
//!
//! Keyframe curves and the per-frame animation pass that writes sampled
//! values into node transforms:
//! - [`KeyframeTrack`]: step/linear/cubic keyed values
//! - [`Animation`]: named property curves with loop-mode time remapping
//! - [`SkeletalAnimation`]: bone-name keyed TRS curves
//! - [`system::update_animation`]: the recursive sampling pass

#[allow(clippy::module_inception)]
pub mod animation;
pub mod system;
pub mod tracks;
pub mod values;

pub use animation::{Animation, BoneAnimation, LoopMode, SkeletalAnimation};
pub use tracks::{InterpolationMode, KeyframeTrack};
pub use values::Interpolatable;
