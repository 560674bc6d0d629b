//! Transform System
//!
//! Propagates local/world matrices down the hierarchy and submits visible
//! nodes to a [`RenderCollector`]. Decoupled from [`Scene`](crate::scene::Scene)
//! so it only borrows the node arena.
//!
//! The walk uses an explicit stack instead of recursion, so deep hierarchies
//! cannot overflow the call stack.

use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::node::Node;
use crate::scene::render::{RenderCollector, RenderItem};
use crate::scene::NodeHandle;

enum Visit {
    /// Refresh the node's matrices, then schedule its children.
    Enter {
        handle: NodeHandle,
        parent_world: Affine3A,
        parent_changed: bool,
    },
    /// All descendants are done; submit the node itself.
    Exit(NodeHandle),
}

/// Updates the subtree rooted at `root`.
///
/// A node's world matrix is rewritten when its own TRS changed since the
/// last pass or when an ancestor's world matrix was rewritten in this pass.
/// `force` treats `root` as if its parent had changed.
///
/// Visible nodes are submitted after their whole subtree has been processed.
pub fn update_hierarchy(
    nodes: &mut SlotMap<NodeHandle, Node>,
    root: NodeHandle,
    parent_world: Affine3A,
    force: bool,
    collector: &mut dyn RenderCollector,
) {
    let mut stack: Vec<Visit> = Vec::with_capacity(64);
    stack.push(Visit::Enter {
        handle: root,
        parent_world,
        parent_changed: force,
    });

    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Enter {
                handle,
                parent_world,
                parent_changed,
            } => {
                let Some(node) = nodes.get_mut(handle) else {
                    continue;
                };

                let local_changed = node.transform.update_local_matrix();
                let world_needs_update = local_changed || parent_changed;

                if world_needs_update {
                    let new_world = parent_world * *node.transform.local_matrix();
                    node.transform.set_world_matrix(new_world);
                }

                let current_world = node.transform.world_matrix;

                stack.push(Visit::Exit(handle));
                stack.extend(node.children.iter().rev().map(|&child| Visit::Enter {
                    handle: child,
                    parent_world: current_world,
                    parent_changed: world_needs_update,
                }));
            }
            Visit::Exit(handle) => {
                let Some(node) = nodes.get(handle) else {
                    continue;
                };
                if node.is_visible() {
                    collector.submit(RenderItem {
                        node: handle,
                        id: node.id,
                        kind: node.kind,
                        world_matrix: node.transform.world_matrix,
                        cast_shadows: node.casts_shadows(),
                    });
                }
            }
        }
    }
}
