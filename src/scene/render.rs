use glam::Affine3A;

use crate::scene::{NodeHandle, NodeId, NodeKind};

/// Drawable content submitted by a visible node during the update pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderItem {
    pub node: NodeHandle,
    pub id: NodeId,
    pub kind: NodeKind,
    pub world_matrix: Affine3A,
    pub cast_shadows: bool,
}

/// Sink for render submissions. The renderer behind it is opaque to the
/// scene graph.
pub trait RenderCollector {
    fn submit(&mut self, item: RenderItem);
}

impl RenderCollector for Vec<RenderItem> {
    fn submit(&mut self, item: RenderItem) {
        self.push(item);
    }
}

/// Discards every submission. Useful for headless transform updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCollector;

impl RenderCollector for NullCollector {
    fn submit(&mut self, _item: RenderItem) {}
}
