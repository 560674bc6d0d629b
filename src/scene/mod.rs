//! Scene Graph
//!
//! Hierarchical scene storage and transform propagation:
//! - [`Node`]: a scene node (hierarchy links, TRS transform, flags, animations)
//! - [`Transform`]: TRS component with cached local/world matrices
//! - [`Scene`]: arena owner and node registry, structural operations
//! - [`transform_system`]: per-frame matrix propagation and render submission
//! - [`Skeleton`]: bone hierarchy driven by skeletal animation
//! - [`RenderCollector`]: sink receiving drawable content of visible nodes

pub mod node;
pub mod render;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod skeleton;
pub mod transform;
pub mod transform_system;

pub use node::{Node, NodeFlags, NodeKind};
pub use render::{NullCollector, RenderCollector, RenderItem};
pub use scene::{HierarchyEntry, Scene};
pub use skeleton::{Bone, Skeleton};
pub use transform::Transform;

use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use slotmap::new_key_type;

new_key_type! {
    /// Generational arena key of a node. Stale handles resolve to `None`.
    pub struct NodeHandle;
    pub struct SkeletonKey;
}

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_SCENE_ID: AtomicU32 = AtomicU32::new(1);

/// Process-wide unique node identifier.
///
/// Identifiers are handed out by a monotonic counter and never reused, so
/// they stay valid as keys in UI-side maps after the node is destroyed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
    pub(crate) fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    #[must_use]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a [`Scene`] instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SceneId(u32);

impl SceneId {
    pub(crate) fn next() -> Self {
        Self(NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed))
    }
}
