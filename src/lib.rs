#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod animation;
pub mod errors;
pub mod gizmo;
pub mod math;
pub mod scene;
pub mod settings;

pub use animation::{Animation, BoneAnimation, InterpolationMode, KeyframeTrack, LoopMode, SkeletalAnimation};
pub use errors::{Result, SceneError};
pub use gizmo::{GizmoAxis, GizmoFrame, HandleDraw, TranslationGizmo, TranslationHandle};
pub use math::Ray;
pub use scene::{
    Bone, HierarchyEntry, Node, NodeFlags, NodeHandle, NodeId, NodeKind, RenderCollector, RenderItem, Scene,
    Skeleton, Transform,
};
pub use settings::GizmoSettings;
