//! Scene Integration Tests
//!
//! Tests for:
//! - Scene: create/insert/destroy nodes, node identifiers, registry lookups
//! - Hierarchy: add_child / remove_child / remove_from_parent, cycle guards
//! - Re-parenting with world transform preservation
//! - Duplication of duplicable subtrees
//! - Hierarchy flattening for tree views

use glam::{Quat, Vec3};
use prism::errors::SceneError;
use prism::scene::{Node, NodeHandle, NodeKind, Scene};

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn node_at(name: &str, position: Vec3) -> Node {
    let mut node = Node::with_name(name);
    node.transform.position = position;
    node
}

/// Every registered node is reachable from the root and every reachable node
/// is registered; parent/child links agree in both directions.
fn assert_consistent(scene: &Scene) {
    let reachable = scene.subtree(scene.root_node());
    assert_eq!(reachable.len(), scene.registered_count());

    for &handle in &reachable {
        let node = scene.get_node(handle).unwrap();
        assert!(scene.is_registered(handle));
        assert_eq!(scene.find_by_id(node.id()), Some(handle));
        for &child in node.children() {
            assert_eq!(scene.get_node(child).unwrap().parent(), Some(handle));
        }
    }
}

// ============================================================================
// Node Creation & Identity
// ============================================================================

#[test]
fn scene_create_node_is_detached() {
    let mut scene = Scene::new();
    let handle = scene.create_node("Cube");

    let node = scene.get_node(handle).unwrap();
    assert_eq!(node.name(), "Cube");
    assert_eq!(node.parent(), None);
    assert!(!node.is_attached());
    assert!(!scene.is_registered(handle));
    assert_eq!(scene.find_by_id(node.id()), None);
}

#[test]
fn scene_unique_ids() {
    let mut scene = Scene::new();
    let a = scene.create_node("a");
    let b = scene.create_node("b");
    let id_a = scene.get_node(a).unwrap().id();
    let id_b = scene.get_node(b).unwrap().id();
    assert_ne!(id_a, id_b);

    // Destroyed identifiers are not handed out again
    scene.destroy_node(a).unwrap();
    let c = scene.create_node("c");
    let id_c = scene.get_node(c).unwrap().id();
    assert_ne!(id_c, id_a);
    assert!(id_c > id_b);
}

#[test]
fn scene_add_node_attaches_to_root() {
    let mut scene = Scene::new();
    let handle = scene.add_node(Node::with_name("child"));

    assert_eq!(scene.get_node(handle).unwrap().parent(), Some(scene.root_node()));
    assert!(scene.get_node(handle).unwrap().is_attached());
    assert_consistent(&scene);
}

#[test]
fn scene_find_by_name_searches_hierarchy_only() {
    let mut scene = Scene::new();
    let lamp = scene.add_node(Node::with_kind(NodeKind::Light));
    scene.get_node_mut(lamp).unwrap().set_name("Lamp");
    scene.create_node("Floating");

    assert_eq!(scene.find_by_name("Lamp"), Some(lamp));
    assert_eq!(scene.find_by_name("Floating"), None);
}

#[test]
fn scene_cloned_node_gets_fresh_id() {
    init_logger();
    let mut scene = Scene::new();
    let template = node_at("Crate", Vec3::new(1.0, 2.0, 3.0));
    let a = scene.add_node(template.clone());
    let b = scene.add_node(template);

    let id_a = scene.get_node(a).unwrap().id();
    let id_b = scene.get_node(b).unwrap().id();
    assert_ne!(id_a, id_b);
    assert_eq!(scene.get_node(a).unwrap().transform.position, Vec3::new(1.0, 2.0, 3.0));
    assert_consistent(&scene);

    scene.remove_node(b).unwrap();
    assert_eq!(scene.find_by_id(id_a), Some(a));
    assert_eq!(scene.find_by_id(id_b), None);
    assert_consistent(&scene);
}

#[test]
fn scene_reinserting_clone_of_attached_node_keeps_registry_consistent() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::with_name("a"));
    let copy = scene.get_node(a).unwrap().clone();
    let c = scene.add_node(copy);

    assert_ne!(scene.get_node(c).unwrap().id(), scene.get_node(a).unwrap().id());
    assert_eq!(scene.registered_count(), 3);
    assert_consistent(&scene);
}

#[test]
fn scene_clone_of_parent_drops_hierarchy_links() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::with_name("parent"));
    let child = scene.create_node_with_kind(NodeKind::Camera);
    scene.add_child(parent, child, false).unwrap();

    let copy = scene.get_node(parent).unwrap().clone();
    assert_eq!(copy.parent(), None);
    assert!(copy.children().is_empty());
    assert!(!copy.is_attached());
    assert_eq!(scene.get_node(child).unwrap().kind(), NodeKind::Camera);
}

// ============================================================================
// Hierarchy: add_child / remove_child
// ============================================================================

#[test]
fn end_to_end_reparent_keeps_world_position() {
    init_logger();
    let mut scene = Scene::new();
    let root = scene.root_node();

    let child = scene.insert_node(node_at("child", Vec3::new(2.0, 0.0, 0.0)));
    scene.add_child(root, child, false).unwrap();
    assert!(vec3_approx(scene.global_position(child).unwrap(), Vec3::new(2.0, 0.0, 0.0)));

    let new_parent = scene.add_node(node_at("new parent", Vec3::new(5.0, 0.0, 0.0)));
    scene.add_child(new_parent, child, true).unwrap();

    assert!(vec3_approx(scene.global_position(child).unwrap(), Vec3::new(2.0, 0.0, 0.0)));
    let local = scene.get_node(child).unwrap().transform.position;
    assert!(vec3_approx(local, Vec3::new(-3.0, 0.0, 0.0)), "got {local}");
    assert_consistent(&scene);
}

#[test]
fn reparent_with_rotation_and_scale_preserves_global() {
    let mut scene = Scene::new();

    let mut a = node_at("a", Vec3::new(1.0, -2.0, 3.0));
    a.transform.rotation = Quat::from_rotation_y(0.8);
    let a = scene.add_node(a);

    let mut b = node_at("b", Vec3::new(-4.0, 0.5, 2.0));
    b.transform.rotation = Quat::from_rotation_z(-1.2);
    b.transform.scale = Vec3::splat(2.0);
    let b = scene.add_node(b);

    let mut n = node_at("n", Vec3::new(0.0, 1.0, 0.0));
    n.transform.rotation = Quat::from_rotation_x(0.4);
    n.transform.scale = Vec3::new(1.0, 2.0, 3.0);
    let n = scene.insert_node(n);
    scene.add_child(a, n, false).unwrap();

    let before = scene.global_transform(n).unwrap();
    scene.add_child(b, n, true).unwrap();
    let after = scene.global_transform(n).unwrap();

    assert!(before.abs_diff_eq(after, 1e-3), "before {before:?} after {after:?}");
}

#[test]
fn add_child_without_keep_world_keeps_local() {
    let mut scene = Scene::new();
    let parent = scene.add_node(node_at("parent", Vec3::new(5.0, 0.0, 0.0)));
    let child = scene.add_node(node_at("child", Vec3::new(2.0, 0.0, 0.0)));

    scene.add_child(parent, child, false).unwrap();

    assert_eq!(scene.get_node(child).unwrap().transform.position, Vec3::new(2.0, 0.0, 0.0));
    assert!(vec3_approx(scene.global_position(child).unwrap(), Vec3::new(7.0, 0.0, 0.0)));
}

#[test]
fn add_child_moves_instead_of_copying() {
    let mut scene = Scene::new();
    let p1 = scene.add_node(Node::with_name("p1"));
    let p2 = scene.add_node(Node::with_name("p2"));
    let child = scene.create_node("child");

    scene.add_child(p1, child, false).unwrap();
    scene.add_child(p2, child, false).unwrap();

    assert!(!scene.get_node(p1).unwrap().children().contains(&child));
    assert_eq!(scene.get_node(p2).unwrap().children(), &[child]);
    assert_eq!(scene.get_node(child).unwrap().parent(), Some(p2));
    assert_consistent(&scene);
}

#[test]
fn add_child_appends_in_order() {
    let mut scene = Scene::new();
    let parent = scene.add_node(Node::with_name("parent"));
    let children: Vec<NodeHandle> = (0..3).map(|i| scene.create_node(&format!("c{i}"))).collect();
    for &c in &children {
        scene.add_child(parent, c, false).unwrap();
    }
    assert_eq!(scene.get_node(parent).unwrap().children(), children.as_slice());
}

#[test]
fn add_child_rejects_cycles() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::with_name("a"));
    let b = scene.create_node("b");
    scene.add_child(a, b, false).unwrap();
    let c = scene.create_node("c");
    scene.add_child(b, c, false).unwrap();

    assert!(matches!(scene.add_child(a, a, false), Err(SceneError::HierarchyCycle { .. })));
    assert!(matches!(scene.add_child(c, a, true), Err(SceneError::HierarchyCycle { .. })));

    // The tree is untouched
    assert_eq!(scene.get_node(a).unwrap().parent(), Some(scene.root_node()));
    assert_eq!(scene.get_node(c).unwrap().parent(), Some(b));
    assert_consistent(&scene);
}

#[test]
fn root_node_cannot_be_moved_or_destroyed() {
    let mut scene = Scene::new();
    let root = scene.root_node();
    let other = scene.create_node("other");

    assert!(matches!(scene.add_child(other, root, false), Err(SceneError::RootNodeImmutable)));
    assert!(matches!(scene.destroy_node(root), Err(SceneError::RootNodeImmutable)));
    assert!(scene.is_root_node(root));
    assert!(!scene.is_root_node(other));
}

#[test]
fn remove_child_unregisters_whole_subtree() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::with_name("a"));
    let b = scene.create_node("b");
    let c = scene.create_node("c");
    scene.add_child(a, b, false).unwrap();
    scene.add_child(b, c, false).unwrap();
    assert_eq!(scene.registered_count(), 4);

    scene.remove_child(scene.root_node(), a).unwrap();

    assert_eq!(scene.registered_count(), 1);
    for h in [a, b, c] {
        let node = scene.get_node(h).unwrap();
        assert!(!node.is_attached());
        assert_eq!(scene.find_by_id(node.id()), None);
    }
    // Internal links of the detached subtree survive
    assert_eq!(scene.get_node(c).unwrap().parent(), Some(b));
    assert_eq!(scene.get_node(a).unwrap().parent(), None);
    assert_consistent(&scene);
}

#[test]
fn remove_child_of_wrong_parent_fails() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::with_name("a"));
    let b = scene.add_node(Node::with_name("b"));

    assert!(matches!(scene.remove_child(a, b), Err(SceneError::NotAChild { .. })));
    assert!(scene.is_registered(b));
}

#[test]
fn remove_from_parent_is_idempotent() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::with_name("a"));

    scene.remove_from_parent(a).unwrap();
    scene.remove_from_parent(a).unwrap();

    assert!(!scene.is_registered(a));
    assert!(!scene.get_node(scene.root_node()).unwrap().children().contains(&a));
    assert_consistent(&scene);
}

#[test]
fn remove_node_detaches_but_keeps_node_alive() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::with_name("a"));

    scene.remove_node(a).unwrap();
    assert!(!scene.is_registered(a));
    assert!(scene.get_node(a).is_some());
    assert!(matches!(scene.remove_node(scene.root_node()), Err(SceneError::RootNodeImmutable)));

    // Can be attached again
    scene.add_child(scene.root_node(), a, false).unwrap();
    assert!(scene.is_registered(a));
    assert_consistent(&scene);
}

#[test]
fn detached_parent_registers_subtree_on_attach() {
    let mut scene = Scene::new();
    let group = scene.create_node("group");
    let leaf = scene.create_node("leaf");
    scene.add_child(group, leaf, false).unwrap();
    assert!(!scene.is_registered(leaf));

    scene.add_child(scene.root_node(), group, false).unwrap();
    assert!(scene.is_registered(group));
    assert!(scene.is_registered(leaf));
    assert_consistent(&scene);
}

#[test]
fn destroy_node_frees_subtree() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::with_name("a"));
    let b = scene.create_node("b");
    scene.add_child(a, b, false).unwrap();
    let before = scene.node_count();

    scene.destroy_node(a).unwrap();

    assert_eq!(scene.node_count(), before - 2);
    assert!(scene.get_node(a).is_none());
    assert!(scene.get_node(b).is_none());
    assert!(matches!(scene.add_child(scene.root_node(), a, false), Err(SceneError::NodeNotFound(_))));
    assert_consistent(&scene);
}

// ============================================================================
// Duplication
// ============================================================================

#[test]
fn duplicate_non_duplicable_returns_none() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::with_name("a"));
    scene.get_node_mut(a).unwrap().set_duplicable(false);

    assert!(scene.duplicate(a).is_none());
    assert!(scene.duplicate(scene.root_node()).is_none());
}

#[test]
fn duplicate_copies_kind_name_and_trs_of_duplicable_subset() {
    let mut scene = Scene::new();

    let mut source = node_at("Lamp", Vec3::new(1.0, 2.0, 3.0));
    source.transform.rotation = Quat::from_rotation_y(0.3);
    source.transform.scale = Vec3::new(1.0, 2.0, 1.0);
    let source = scene.add_node(source);
    scene.get_node_mut(source).unwrap().hide();

    let kept = scene.insert_node(Node::with_kind(NodeKind::Light));
    scene.add_child(source, kept, false).unwrap();
    let grandchild = scene.create_node("grandchild");
    scene.add_child(kept, grandchild, false).unwrap();

    let skipped = scene.create_node("skipped");
    scene.get_node_mut(skipped).unwrap().set_duplicable(false);
    scene.add_child(source, skipped, false).unwrap();
    let under_skipped = scene.create_node("under skipped");
    scene.add_child(skipped, under_skipped, false).unwrap();

    let registered_before = scene.registered_count();
    let copy = scene.duplicate(source).unwrap();

    let original = scene.get_node(source).unwrap();
    let dup = scene.get_node(copy).unwrap();
    assert_ne!(dup.id(), original.id());
    assert_eq!(dup.name(), "Lamp");
    assert_eq!(dup.kind(), original.kind());
    assert_eq!(dup.transform.position, original.transform.position);
    assert_eq!(dup.transform.rotation, original.transform.rotation);
    assert_eq!(dup.transform.scale, original.transform.scale);

    // Only the duplicable child (and its own subtree) is mirrored
    assert_eq!(dup.children().len(), 1);
    let dup_child = scene.get_node(dup.children()[0]).unwrap();
    assert_eq!(dup_child.kind(), NodeKind::Light);
    assert_eq!(dup_child.children().len(), 1);

    // The copy is detached and the original is untouched
    assert_eq!(dup.parent(), None);
    assert!(!scene.is_registered(copy));
    assert_eq!(scene.registered_count(), registered_before);
    assert_eq!(scene.get_node(source).unwrap().children(), &[kept, skipped]);
    assert_consistent(&scene);
}

// ============================================================================
// Hierarchy Flattening
// ============================================================================

#[test]
fn flatten_hierarchy_is_pre_order_with_depth() {
    let mut scene = Scene::new();
    let a = scene.add_node(Node::with_name("a"));
    let a1 = scene.create_node("a1");
    scene.add_child(a, a1, false).unwrap();
    let b = scene.add_node(Node::with_name("b"));
    scene.get_node_mut(b).unwrap().hide();

    let rows = scene.flatten_hierarchy();
    let summary: Vec<(&str, usize, bool)> = rows.iter().map(|r| (r.name.as_str(), r.depth, r.visible)).collect();

    assert_eq!(
        summary,
        vec![("Root", 0, true), ("a", 1, true), ("a1", 2, true), ("b", 1, false)]
    );
    assert_eq!(rows[3].handle, b);
}
