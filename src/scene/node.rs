use std::sync::Arc;

use bitflags::bitflags;
use glam::Vec3;

use crate::animation::Animation;
use crate::errors::{Result, SceneError};
use crate::scene::transform::Transform;
use crate::scene::{NodeHandle, NodeId, SceneId, SkeletonKey};

bitflags! {
    /// Editor-facing behaviour switches of a node.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Rendered during the update pass.
        const VISIBLE      = 1 << 0;
        /// Can be copied by [`Scene::duplicate`](crate::scene::Scene::duplicate).
        const DUPLICABLE   = 1 << 1;
        /// Can be deleted from the hierarchy by the user.
        const REMOVABLE    = 1 << 2;
        /// Can be selected by viewport picking.
        const PICKABLE     = 1 << 3;
        /// Contributes to shadow maps.
        const CAST_SHADOWS = 1 << 4;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::all()
    }
}

/// The concrete kind of a node. Duplication preserves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeKind {
    #[default]
    Empty,
    /// A mesh, optionally deformed by a skeleton stored in the scene.
    Mesh { skeleton: Option<SkeletonKey> },
    Light,
    Camera,
}

/// A scene node.
///
/// # Hierarchy
///
/// Nodes are stored in the [`Scene`](crate::scene::Scene) arena and link to
/// each other through handles:
/// - `parent`: the owning node, `None` for the root and for detached nodes
/// - `children`: ordered child handles
///
/// Both sides are only mutated by the scene's structural operations, which
/// keep them consistent.
///
/// Cloning yields a new, detached node: it gets a fresh [`NodeId`] and drops
/// the hierarchy links of the source.
#[derive(Debug)]
pub struct Node {
    pub(crate) id: NodeId,
    pub name: String,
    pub(crate) kind: NodeKind,
    pub flags: NodeFlags,

    /// Local TRS relative to the parent.
    pub transform: Transform,

    pub(crate) animation: Option<Arc<Animation>>,
    pub(crate) animations: Vec<Arc<Animation>>,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,
    /// Set while the node is registered in a scene's registry.
    pub(crate) scene: Option<SceneId>,
}

impl Node {
    /// Creates an empty node named `SceneNode{id}`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_kind(NodeKind::Empty)
    }

    #[must_use]
    pub fn with_kind(kind: NodeKind) -> Self {
        let id = NodeId::next();
        Self {
            id,
            name: format!("SceneNode{id}"),
            kind,
            flags: NodeFlags::default(),
            transform: Transform::new(),
            animation: None,
            animations: Vec::new(),
            parent: None,
            children: Vec::new(),
            scene: None,
        }
    }

    #[must_use]
    pub fn with_name(name: &str) -> Self {
        let mut node = Self::new();
        node.name = name.to_string();
        node
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// Whether the node is currently registered in a scene.
    #[inline]
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.scene.is_some()
    }

    #[inline]
    #[must_use]
    pub fn scene_id(&self) -> Option<SceneId> {
        self.scene
    }

    // ========================================================================
    // Flags
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.flags.contains(NodeFlags::VISIBLE)
    }

    pub fn show(&mut self) {
        self.flags.insert(NodeFlags::VISIBLE);
    }

    pub fn hide(&mut self) {
        self.flags.remove(NodeFlags::VISIBLE);
    }

    #[inline]
    #[must_use]
    pub fn is_duplicable(&self) -> bool {
        self.flags.contains(NodeFlags::DUPLICABLE)
    }

    pub fn set_duplicable(&mut self, duplicable: bool) {
        self.flags.set(NodeFlags::DUPLICABLE, duplicable);
    }

    #[inline]
    #[must_use]
    pub fn is_removable(&self) -> bool {
        self.flags.contains(NodeFlags::REMOVABLE)
    }

    pub fn set_removable(&mut self, removable: bool) {
        self.flags.set(NodeFlags::REMOVABLE, removable);
    }

    #[inline]
    #[must_use]
    pub fn is_pickable(&self) -> bool {
        self.flags.contains(NodeFlags::PICKABLE)
    }

    pub fn set_pickable(&mut self, pickable: bool) {
        self.flags.set(NodeFlags::PICKABLE, pickable);
    }

    #[inline]
    #[must_use]
    pub fn casts_shadows(&self) -> bool {
        self.flags.contains(NodeFlags::CAST_SHADOWS)
    }

    pub fn set_cast_shadows(&mut self, cast: bool) {
        self.flags.set(NodeFlags::CAST_SHADOWS, cast);
    }

    // ========================================================================
    // Animations
    // ========================================================================

    /// Sets the animation sampled by the animation pass.
    pub fn set_animation(&mut self, animation: Arc<Animation>) {
        self.animation = Some(animation);
    }

    pub fn clear_animation(&mut self) {
        self.animation = None;
    }

    #[must_use]
    pub fn animation(&self) -> Option<&Arc<Animation>> {
        self.animation.as_ref()
    }

    #[must_use]
    pub fn has_active_animation(&self) -> bool {
        self.animation.is_some()
    }

    /// Adds an animation to the node's library without activating it.
    pub fn add_animation(&mut self, animation: Arc<Animation>) {
        self.animations.push(animation);
    }

    #[must_use]
    pub fn animations(&self) -> &[Arc<Animation>] {
        &self.animations
    }

    pub fn delete_animation(&mut self, index: usize) -> Result<Arc<Animation>> {
        if index >= self.animations.len() {
            return Err(SceneError::AnimationIndexOutOfRange {
                index,
                count: self.animations.len(),
            });
        }
        Ok(self.animations.remove(index))
    }

    /// Removes the first library animation called `name`.
    pub fn delete_animation_by_name(&mut self, name: &str) -> Option<Arc<Animation>> {
        let index = self.animations.iter().position(|a| a.name == name)?;
        Some(self.animations.remove(index))
    }

    // ========================================================================
    // Named properties
    // ========================================================================

    /// Reads an animatable property by name.
    ///
    /// `"rotation"` is reported as Euler angles in degrees.
    #[must_use]
    pub fn property_value(&self, name: &str) -> Option<Vec3> {
        match name {
            "position" => Some(self.transform.position),
            "rotation" => Some(self.transform.rotation_euler_degrees()),
            "scale" => Some(self.transform.scale),
            _ => None,
        }
    }

    /// Writes an animatable property by name. Returns `false` for unknown
    /// names.
    pub fn set_property_value(&mut self, name: &str, value: Vec3) -> bool {
        match name {
            "position" => self.transform.position = value,
            "rotation" => self.transform.set_rotation_euler_degrees(value),
            "scale" => self.transform.scale = value,
            _ => return false,
        }
        true
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Node {
    fn clone(&self) -> Self {
        Self {
            id: NodeId::next(),
            name: self.name.clone(),
            kind: self.kind,
            flags: self.flags,
            transform: self.transform.clone(),
            animation: self.animation.clone(),
            animations: self.animations.clone(),
            parent: None,
            children: Vec::new(),
            scene: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_nodes_get_distinct_ids_and_default_names() {
        let a = Node::new();
        let b = Node::new();
        assert_ne!(a.id(), b.id());
        assert!(b.id() > a.id());
        assert_eq!(a.name(), format!("SceneNode{}", a.id()));
    }

    #[test]
    fn default_flags_are_all_set() {
        let node = Node::new();
        assert!(node.is_visible());
        assert!(node.is_duplicable());
        assert!(node.is_removable());
        assert!(node.is_pickable());
        assert!(node.casts_shadows());
    }

    #[test]
    fn show_hide_toggle_visibility_only() {
        let mut node = Node::new();
        node.hide();
        assert!(!node.is_visible());
        assert!(node.is_duplicable());
        node.show();
        assert!(node.is_visible());
    }

    #[test]
    fn property_round_trip_through_names() {
        let mut node = Node::new();
        assert!(node.set_property_value("position", Vec3::new(1.0, 2.0, 3.0)));
        assert!(node.set_property_value("rotation", Vec3::new(0.0, 90.0, 0.0)));
        assert!(!node.set_property_value("opacity", Vec3::ONE));

        assert_eq!(node.property_value("position"), Some(Vec3::new(1.0, 2.0, 3.0)));
        let euler = node.property_value("rotation").expect("rotation is a known property");
        assert!((euler.y - 90.0).abs() < 1e-3);
        assert_eq!(node.property_value("opacity"), None);
    }
}
