use glam::{Affine3A, Vec3, Vec4};

use crate::gizmo::handle::{GizmoFrame, TranslationHandle};
use crate::gizmo::GizmoAxis;
use crate::math::Ray;
use crate::scene::{Node, NodeHandle, Scene};
use crate::settings::GizmoSettings;

/// Recorded when a drag starts; deltas are measured against it.
#[derive(Debug, Clone, Copy)]
struct DragState {
    axis: GizmoAxis,
    start_hit: Vec3,
    node_start_position: Vec3,
}

/// One handle to draw this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleDraw {
    pub axis: GizmoAxis,
    pub world_matrix: Affine3A,
    pub color: Vec4,
    pub highlighted: bool,
}

/// Three-axis translation gizmo.
///
/// # States
///
/// - **Idle**: no handle is dragged. Hover feedback comes from
///   [`TranslationGizmo::get_hit_handle`].
/// - **Dragging**: entered by [`TranslationGizmo::start_dragging`] when a
///   handle is hit. Each [`TranslationGizmo::drag`] moves the selected node by
///   the distance the hit point travelled along the dragged axis since the
///   drag started. [`TranslationGizmo::end_dragging`] returns to Idle.
///
/// The selected node is managed by the host; the gizmo only reads and writes
/// its position.
#[derive(Debug, Clone)]
pub struct TranslationGizmo {
    handles: [TranslationHandle; 3],
    settings: GizmoSettings,
    frame: GizmoFrame,
    selected: Option<NodeHandle>,
    drag: Option<DragState>,
}

impl Default for TranslationGizmo {
    fn default() -> Self {
        Self::new(GizmoSettings::default())
    }
}

impl TranslationGizmo {
    #[must_use]
    pub fn new(settings: GizmoSettings) -> Self {
        let handles = GizmoAxis::ALL.map(|axis| TranslationHandle::new(axis, &settings));
        Self {
            handles,
            settings,
            frame: GizmoFrame::default(),
            selected: None,
            drag: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &GizmoSettings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub fn handles(&self) -> &[TranslationHandle; 3] {
        &self.handles
    }

    #[inline]
    #[must_use]
    pub fn handle(&self, axis: GizmoAxis) -> &TranslationHandle {
        &self.handles[axis.index()]
    }

    // ========================================================================
    // Placement
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn frame(&self) -> GizmoFrame {
        self.frame
    }

    #[inline]
    #[must_use]
    pub fn transform(&self) -> Affine3A {
        self.frame.transform
    }

    pub fn set_transform(&mut self, transform: Affine3A) {
        self.frame.transform = transform;
    }

    #[inline]
    #[must_use]
    pub fn gizmo_scale(&self) -> f32 {
        self.frame.scale
    }

    pub fn set_gizmo_scale(&mut self, scale: f32) {
        self.frame.scale = scale;
    }

    /// Moves the gizmo onto the selected node and sizes it by its distance
    /// from the camera, so it keeps a constant on-screen size.
    ///
    /// Returns `false` (leaving the gizmo untouched) without a live selection.
    pub fn follow_node(&mut self, scene: &Scene, camera_position: Vec3) -> bool {
        let Some(position) = self.selected.and_then(|h| scene.global_position(h)) else {
            return false;
        };

        let distance = camera_position.distance(position);
        self.frame = GizmoFrame {
            transform: Affine3A::from_translation(position),
            scale: if distance > 0.0 {
                distance * self.settings.size_factor
            } else {
                1.0
            },
        };
        true
    }

    // ========================================================================
    // Selection
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn selected_node(&self) -> Option<NodeHandle> {
        self.selected
    }

    /// Changes the manipulated node. A drag in progress is ended.
    pub fn set_selected_node(&mut self, node: Option<NodeHandle>) {
        if node != self.selected && self.is_dragging() {
            self.end_dragging();
        }
        self.selected = node;
    }

    // ========================================================================
    // Dragging
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    #[inline]
    #[must_use]
    pub fn dragged_handle(&self) -> Option<GizmoAxis> {
        self.drag.map(|d| d.axis)
    }

    /// Hit position recorded when the current drag started.
    #[must_use]
    pub fn drag_start_hit(&self) -> Option<Vec3> {
        self.drag.map(|d| d.start_hit)
    }

    /// Selected node's global position recorded when the current drag started.
    #[must_use]
    pub fn drag_start_position(&self) -> Option<Vec3> {
        self.drag.map(|d| d.node_start_position)
    }

    /// Begins a drag if `ray` hits a handle and a node is selected.
    ///
    /// Any previous drag is discarded first, so a miss leaves the gizmo Idle.
    pub fn start_dragging(&mut self, scene: &Scene, ray: Ray) -> bool {
        self.drag = None;

        let Some((axis, start_hit)) = self.get_hit_handle(ray) else {
            return false;
        };
        let Some(node_start_position) = self.selected.and_then(|h| scene.global_position(h)) else {
            log::debug!("Gizmo handle {axis:?} hit without a selected node");
            return false;
        };

        self.drag = Some(DragState {
            axis,
            start_hit,
            node_start_position,
        });
        log::debug!("Gizmo drag started on {axis:?} at {start_hit}");
        true
    }

    /// Moves the selected node along the dragged axis.
    ///
    /// The node's new global position is its drag-start position plus the
    /// distance the hit point travelled since the drag started; it is written
    /// back as a local position relative to the node's parent. Returns
    /// whether the node was moved.
    pub fn drag(&self, scene: &mut Scene, ray: Ray) -> bool {
        let Some(state) = self.drag else {
            return false;
        };
        let Some(selected) = self.selected else {
            return false;
        };

        let sliding = self.handle(state.axis).hit_position(&self.frame, ray);
        let target = state.node_start_position + (sliding - state.start_hit);

        let Some(parent) = scene.get_node(selected).map(Node::parent) else {
            return false;
        };
        let parent_global = parent
            .and_then(|p| scene.global_transform(p))
            .unwrap_or(Affine3A::IDENTITY);
        let local_target = parent_global.inverse().transform_point3(target);

        let Some(node) = scene.get_node_mut(selected) else {
            return false;
        };
        node.transform.position = local_target;
        true
    }

    /// Returns to Idle, forgetting the dragged handle.
    pub fn end_dragging(&mut self) {
        if let Some(state) = self.drag.take() {
            log::debug!("Gizmo drag on {:?} ended", state.axis);
        }
    }

    // ========================================================================
    // Hit testing
    // ========================================================================

    /// The hit handle whose hit position lies closest to the ray origin,
    /// together with that position.
    #[must_use]
    pub fn get_hit_handle(&self, ray: Ray) -> Option<(GizmoAxis, Vec3)> {
        let mut closest: Option<(f32, GizmoAxis, Vec3)> = None;

        for handle in &self.handles {
            if !handle.is_hit(&self.frame, ray) {
                continue;
            }
            let hit = handle.hit_position(&self.frame, ray);
            let distance = hit.distance(ray.origin);
            if closest.is_none_or(|(best, _, _)| distance < best) {
                closest = Some((distance, handle.axis(), hit));
            }
        }

        closest.map(|(_, axis, hit)| (axis, hit))
    }

    /// Whether `ray` hits any handle.
    #[must_use]
    pub fn is_hit(&self, ray: Ray) -> bool {
        self.handles.iter().any(|h| h.is_hit(&self.frame, ray))
    }

    // ========================================================================
    // Visualization
    // ========================================================================

    /// Handles to draw for the current state.
    ///
    /// While dragging only the dragged handle is listed, highlighted. While
    /// idle all three are listed and the one under `ray` is highlighted.
    #[must_use]
    pub fn draw_list(&self, ray: Ray) -> Vec<HandleDraw> {
        let draw = |handle: &TranslationHandle, highlighted: bool| HandleDraw {
            axis: handle.axis(),
            world_matrix: self.frame.transform
                * Affine3A::from_scale(Vec3::splat(self.frame.scale * handle.handle_radius)),
            color: if highlighted {
                self.settings.highlight_color
            } else {
                handle.color
            },
            highlighted,
        };

        if let Some(state) = self.drag {
            return vec![draw(self.handle(state.axis), true)];
        }

        let hovered = self.get_hit_handle(ray).map(|(axis, _)| axis);
        self.handles
            .iter()
            .map(|h| draw(h, Some(h.axis()) == hovered))
            .collect()
    }
}
