use crate::animation::{Animation, SkeletalAnimation};
use crate::scene::{Node, NodeHandle, NodeKind, Scene};

/// Samples active animations for the subtree rooted at `start`.
///
/// Each node with an active animation remaps `time` through the animation's
/// loop mode, writes the sampled `position`/`rotation`/`scale` curves into
/// its transform, and hands the remapped time down to its children. Nodes
/// without an animation pass `time` through unchanged.
///
/// If the animation carries skeletal data, every node in the animated
/// node's subtree whose name matches a bone takes that bone's pose, and
/// every skinned mesh in the subtree has its skeleton posed.
pub fn update_animation(scene: &mut Scene, start: NodeHandle, time: f32) {
    let mut stack: Vec<(NodeHandle, f32)> = vec![(start, time)];

    while let Some((handle, inherited_time)) = stack.pop() {
        let Some(node) = scene.nodes.get_mut(handle) else {
            continue;
        };

        let mut time = inherited_time;
        let mut skeletal = None;

        if let Some(animation) = node.animation.clone() {
            time = animation.sample_time(inherited_time);
            apply_property_curves(node, &animation, time);
            skeletal = animation.skeletal_animation().cloned();
        }

        stack.extend(node.children.iter().rev().map(|&child| (child, time)));

        if let Some(skeletal) = skeletal {
            apply_skeletal_animation(scene, handle, &skeletal, time);
        }
    }
}

fn apply_property_curves(node: &mut Node, animation: &Animation, time: f32) {
    for property in animation.property_names() {
        let Some(value) = animation.sample_property(property, time) else {
            continue;
        };
        if !node.set_property_value(property, value) {
            log::trace!("Animation '{}' drives unknown property '{property}'", animation.name);
        }
    }
}

fn apply_skeletal_animation(scene: &mut Scene, root: NodeHandle, skeletal: &SkeletalAnimation, time: f32) {
    for handle in scene.subtree(root) {
        let Some(node) = scene.nodes.get_mut(handle) else {
            continue;
        };

        if let Some(bone) = skeletal.bone(&node.name) {
            let (position, rotation, scale) = bone.sample(time);
            node.transform.position = position;
            node.transform.rotation = rotation;
            node.transform.scale = scale;
        }

        if let NodeKind::Mesh { skeleton: Some(key) } = node.kind
            && let Some(skeleton) = scene.skeletons.get_mut(key)
        {
            skeleton.apply_animation(skeletal, time);
        }
    }
}
