use glam::{Affine3A, Vec3};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::animation::system;
use crate::errors::{Result, SceneError};
use crate::scene::node::{Node, NodeFlags, NodeKind};
use crate::scene::render::RenderCollector;
use crate::scene::skeleton::Skeleton;
use crate::scene::transform_system;
use crate::scene::{NodeHandle, NodeId, SceneId, SkeletonKey};

/// One row of [`Scene::flatten_hierarchy`].
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyEntry {
    pub handle: NodeHandle,
    pub id: NodeId,
    pub name: String,
    /// Distance from the root (the root itself is depth 0).
    pub depth: usize,
    pub visible: bool,
}

/// Scene graph storage.
///
/// The scene owns every node in an arena, including nodes that are not
/// currently part of the hierarchy (freshly created, duplicated, or
/// detached). The registry maps [`NodeId`]s to handles for exactly the nodes
/// reachable from the root; structural operations keep the two in sync.
pub struct Scene {
    id: SceneId,
    pub(crate) nodes: SlotMap<NodeHandle, Node>,
    registry: FxHashMap<NodeId, NodeHandle>,
    root: NodeHandle,
    pub(crate) skeletons: SlotMap<SkeletonKey, Skeleton>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Creates a scene containing only its root node.
    #[must_use]
    pub fn new() -> Self {
        let id = SceneId::next();
        let mut nodes = SlotMap::with_key();

        let mut root_node = Node::with_name("Root");
        root_node.flags.remove(NodeFlags::DUPLICABLE | NodeFlags::REMOVABLE);
        root_node.scene = Some(id);
        let root_id = root_node.id;
        let root = nodes.insert(root_node);

        let mut registry = FxHashMap::default();
        registry.insert(root_id, root);

        Self {
            id,
            nodes,
            registry,
            root,
            skeletons: SlotMap::with_key(),
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> SceneId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn root_node(&self) -> NodeHandle {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn is_root_node(&self, handle: NodeHandle) -> bool {
        handle == self.root
    }

    // ========================================================================
    // Node creation & lookup
    // ========================================================================

    /// Creates a detached empty node and returns its handle.
    pub fn create_node(&mut self, name: &str) -> NodeHandle {
        self.insert_node(Node::with_name(name))
    }

    /// Creates a detached node of the given kind with the default name.
    pub fn create_node_with_kind(&mut self, kind: NodeKind) -> NodeHandle {
        self.insert_node(Node::with_kind(kind))
    }

    /// Moves `node` into the arena as a detached node.
    ///
    /// Hierarchy links carried by the value are discarded.
    pub fn insert_node(&mut self, mut node: Node) -> NodeHandle {
        node.parent = None;
        node.children.clear();
        node.scene = None;
        self.nodes.insert(node)
    }

    /// Inserts `node` and attaches it directly under the root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.insert_node(node);
        self.link(self.root, handle);
        self.register_subtree(handle);
        handle
    }

    /// Takes `handle` and its subtree out of the hierarchy. The nodes stay in
    /// the arena and can be attached again.
    pub fn remove_node(&mut self, handle: NodeHandle) -> Result<()> {
        if handle == self.root {
            return Err(SceneError::RootNodeImmutable);
        }
        self.remove_from_parent(handle)
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains_key(handle)
    }

    /// Looks up a node that is part of the hierarchy by its identifier.
    #[must_use]
    pub fn find_by_id(&self, id: NodeId) -> Option<NodeHandle> {
        self.registry.get(&id).copied()
    }

    /// Whether the node is reachable from the root.
    #[must_use]
    pub fn is_registered(&self, handle: NodeHandle) -> bool {
        self.nodes
            .get(handle)
            .is_some_and(|node| self.registry.get(&node.id) == Some(&handle))
    }

    /// Number of nodes in the hierarchy, root included.
    #[must_use]
    pub fn registered_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of nodes in the arena, detached ones included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// First node in the hierarchy (pre-order) named `name`.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<NodeHandle> {
        self.subtree(self.root)
            .into_iter()
            .find(|&h| self.nodes.get(h).is_some_and(|n| n.name == name))
    }

    // ========================================================================
    // Skeletons
    // ========================================================================

    pub fn add_skeleton(&mut self, skeleton: Skeleton) -> SkeletonKey {
        self.skeletons.insert(skeleton)
    }

    #[must_use]
    pub fn skeleton(&self, key: SkeletonKey) -> Option<&Skeleton> {
        self.skeletons.get(key)
    }

    pub fn skeleton_mut(&mut self, key: SkeletonKey) -> Option<&mut Skeleton> {
        self.skeletons.get_mut(key)
    }

    // ========================================================================
    // Structural operations
    // ========================================================================

    /// Attaches `child` as the last child of `parent`.
    ///
    /// A child that already has a parent is moved, not copied. With
    /// `keep_world_transform`, the child's local TRS is rewritten so its
    /// global transform is unchanged by the move (shear is not preserved).
    ///
    /// The child's subtree joins the scene registry iff `parent` is part of
    /// the hierarchy.
    pub fn add_child(&mut self, parent: NodeHandle, child: NodeHandle, keep_world_transform: bool) -> Result<()> {
        let parent_id = self.node(parent)?.id;
        let child_id = self.node(child)?.id;

        if child == self.root {
            return Err(SceneError::RootNodeImmutable);
        }
        if child == parent || self.is_ancestor(child, parent) {
            log::warn!("Rejected attaching node {child_id} under its own descendant {parent_id}");
            return Err(SceneError::HierarchyCycle {
                child: child_id,
                parent: parent_id,
            });
        }

        let initial_global = if keep_world_transform {
            self.global_transform(child)
        } else {
            None
        };

        self.detach(child);
        self.link(parent, child);
        if self.is_registered(parent) {
            self.register_subtree(child);
        }

        if let Some(initial_global) = initial_global {
            let parent_global = self.global_transform(parent).unwrap_or(Affine3A::IDENTITY);
            let diff = parent_global.inverse() * initial_global;
            if let Some(node) = self.nodes.get_mut(child) {
                node.transform.apply_local_matrix(&diff);
            }
        }

        log::debug!("Attached node {child_id} under {parent_id} (keep world transform: {keep_world_transform})");
        Ok(())
    }

    /// Detaches `child` from `parent` and removes its subtree from the
    /// registry. The nodes stay in the arena.
    pub fn remove_child(&mut self, parent: NodeHandle, child: NodeHandle) -> Result<()> {
        let parent_id = self.node(parent)?.id;
        let child_node = self.node(child)?;
        let child_id = child_node.id;
        if child_node.parent != Some(parent) {
            return Err(SceneError::NotAChild {
                parent: parent_id,
                child: child_id,
            });
        }

        self.detach(child);
        log::debug!("Removed node {child_id} from {parent_id}");
        Ok(())
    }

    /// Detaches `handle` from its parent, if any.
    pub fn remove_from_parent(&mut self, handle: NodeHandle) -> Result<()> {
        match self.node(handle)?.parent {
            Some(parent) => self.remove_child(parent, handle),
            None => Ok(()),
        }
    }

    /// Detaches `handle` and frees it together with its whole subtree.
    pub fn destroy_node(&mut self, handle: NodeHandle) -> Result<()> {
        if handle == self.root {
            return Err(SceneError::RootNodeImmutable);
        }
        self.node(handle)?;

        self.detach(handle);
        let subtree = self.subtree(handle);
        for h in &subtree {
            self.nodes.remove(*h);
        }
        log::debug!("Destroyed {} node(s)", subtree.len());
        Ok(())
    }

    /// Copies `handle` and its duplicable descendants.
    ///
    /// Returns `None` if the node is stale or not duplicable. Non-duplicable
    /// descendants are skipped together with their subtrees. The copy is
    /// detached; attaching it is up to the caller.
    pub fn duplicate(&mut self, handle: NodeHandle) -> Option<NodeHandle> {
        let source = self.nodes.get(handle)?;
        if !source.is_duplicable() {
            log::debug!("Node {} is not duplicable", source.id);
            return None;
        }

        let mut copy = Node::with_kind(source.kind);
        copy.name.clone_from(&source.name);
        copy.transform.position = source.transform.position;
        copy.transform.rotation = source.transform.rotation;
        copy.transform.scale = source.transform.scale;
        let children = source.children.clone();

        let copy_handle = self.nodes.insert(copy);
        for child in children {
            if let Some(child_copy) = self.duplicate(child) {
                self.link(copy_handle, child_copy);
            }
        }

        Some(copy_handle)
    }

    // ========================================================================
    // Transform queries
    // ========================================================================

    /// `translate(position) * rotate(rotation) * scale(scale)` of the node,
    /// recomputed from its TRS.
    #[must_use]
    pub fn local_transform(&self, handle: NodeHandle) -> Option<Affine3A> {
        Some(self.nodes.get(handle)?.transform.compute_local_matrix())
    }

    /// Parent global transform times local transform, recomputed along the
    /// whole ancestor chain. A parentless node's global transform is its
    /// local transform.
    #[must_use]
    pub fn global_transform(&self, handle: NodeHandle) -> Option<Affine3A> {
        let node = self.nodes.get(handle)?;
        let mut global = node.transform.compute_local_matrix();
        let mut current = node.parent;

        while let Some(parent_handle) = current {
            let Some(parent) = self.nodes.get(parent_handle) else {
                break;
            };
            global = parent.transform.compute_local_matrix() * global;
            current = parent.parent;
        }

        Some(global)
    }

    /// Translation column of the global transform.
    #[must_use]
    pub fn global_position(&self, handle: NodeHandle) -> Option<Vec3> {
        self.global_transform(handle).map(|m| Vec3::from(m.translation))
    }

    // ========================================================================
    // Per-frame passes
    // ========================================================================

    /// Refreshes cached matrices for the whole hierarchy and submits visible
    /// nodes to `collector`.
    pub fn update(&mut self, dt: f32, collector: &mut dyn RenderCollector) {
        log::trace!("Scene {:?} update (dt = {dt})", self.id);
        transform_system::update_hierarchy(&mut self.nodes, self.root, Affine3A::IDENTITY, false, collector);
    }

    /// Same as [`Scene::update`] but limited to the subtree at `handle`.
    pub fn update_node(&mut self, handle: NodeHandle, dt: f32, collector: &mut dyn RenderCollector) -> Result<()> {
        let parent = self.node(handle)?.parent;
        let parent_world = parent
            .and_then(|p| self.global_transform(p))
            .unwrap_or(Affine3A::IDENTITY);

        log::trace!("Subtree update at {handle:?} (dt = {dt})");
        transform_system::update_hierarchy(&mut self.nodes, handle, parent_world, true, collector);
        Ok(())
    }

    /// Samples active animations for the subtree at `handle` at `time`.
    pub fn update_animation(&mut self, handle: NodeHandle, time: f32) -> Result<()> {
        self.node(handle)?;
        system::update_animation(self, handle, time);
        Ok(())
    }

    /// Samples active animations for the whole hierarchy.
    pub fn update_animations(&mut self, time: f32) {
        let root = self.root;
        system::update_animation(self, root, time);
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// Pre-order rows of the hierarchy, starting at the root.
    #[must_use]
    pub fn flatten_hierarchy(&self) -> Vec<HierarchyEntry> {
        let mut rows = Vec::with_capacity(self.registry.len());
        let mut stack = vec![(self.root, 0usize)];

        while let Some((handle, depth)) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            rows.push(HierarchyEntry {
                handle,
                id: node.id,
                name: node.name.clone(),
                depth,
                visible: node.is_visible(),
            });
            stack.extend(node.children.iter().rev().map(|&c| (c, depth + 1)));
        }

        rows
    }

    /// `handle` and all of its descendants, in pre-order.
    #[must_use]
    pub fn subtree(&self, handle: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        let mut stack = vec![handle];
        while let Some(h) = stack.pop() {
            if let Some(node) = self.nodes.get(h) {
                out.push(h);
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    /// Whether `ancestor` appears on the parent chain of `handle`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeHandle, handle: NodeHandle) -> bool {
        let mut current = self.nodes.get(handle).and_then(|n| n.parent);
        while let Some(h) = current {
            if h == ancestor {
                return true;
            }
            current = self.nodes.get(h).and_then(|n| n.parent);
        }
        false
    }

    // ========================================================================
    // Internal bookkeeping
    // ========================================================================

    fn node(&self, handle: NodeHandle) -> Result<&Node> {
        self.nodes.get(handle).ok_or(SceneError::NodeNotFound(handle))
    }

    /// Appends `child` to `parent`'s children without touching the registry.
    fn link(&mut self, parent: NodeHandle, child: NodeHandle) {
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
            c.transform.mark_dirty();
        }
    }

    /// Unlinks `child` from its parent and unregisters its subtree.
    fn detach(&mut self, child: NodeHandle) {
        let Some(old_parent) = self.nodes.get(child).and_then(|n| n.parent) else {
            return;
        };

        if let Some(p) = self.nodes.get_mut(old_parent)
            && let Some(i) = p.children.iter().position(|&x| x == child)
        {
            p.children.remove(i);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = None;
            c.transform.mark_dirty();
        }

        self.unregister_subtree(child);
    }

    fn register_subtree(&mut self, handle: NodeHandle) {
        for h in self.subtree(handle) {
            if let Some(node) = self.nodes.get_mut(h) {
                node.scene = Some(self.id);
                self.registry.insert(node.id, h);
            }
        }
    }

    fn unregister_subtree(&mut self, handle: NodeHandle) {
        for h in self.subtree(handle) {
            if let Some(node) = self.nodes.get_mut(h) {
                node.scene = None;
                self.registry.remove(&node.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_scene_registers_only_root() {
        let scene = Scene::new();
        let root = scene.root_node();
        assert_eq!(scene.registered_count(), 1);
        assert!(scene.is_registered(root));
        assert!(scene.is_root_node(root));

        let root_node = scene.get_node(root).expect("root exists");
        assert!(!root_node.is_duplicable());
        assert!(!root_node.is_removable());
        assert_eq!(scene.find_by_id(root_node.id()), Some(root));
    }

    #[test]
    fn detach_keeps_links_consistent() {
        let mut scene = Scene::new();
        let a = scene.add_node(Node::with_name("a"));
        let b = scene.create_node("b");
        scene.add_child(a, b, false).expect("attach");

        scene.detach(b);
        assert!(scene.get_node(a).expect("a").children().is_empty());
        assert_eq!(scene.get_node(b).expect("b").parent(), None);
        assert!(!scene.is_registered(b));
    }

    #[test]
    fn duplicate_of_stale_handle_is_none() {
        let mut scene = Scene::new();
        let a = scene.create_node("a");
        scene.destroy_node(a).expect("destroy detached node");
        assert!(scene.duplicate(a).is_none());
    }
}
