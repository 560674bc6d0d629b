//! Gizmo Settings
//!
//! Tunables for the translation gizmo. Every field has a default, so a JSON
//! document only needs to name the values it overrides:
//!
//! ```rust,ignore
//! let settings = GizmoSettings::from_json_str(r#"{ "size_factor": 0.2 }"#)?;
//! ```

use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Yellow, used for the hovered or dragged handle.
pub const DEFAULT_HIGHLIGHT_COLOR: Vec4 = Vec4::new(1.0, 1.0, 0.0, 1.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GizmoSettings {
    /// Length of a handle's hit segment before scaling.
    pub handle_length: f32,
    /// Scales both the hit segment length and the hit threshold.
    pub handle_scale: f32,
    /// Scale applied to handle meshes when drawing.
    pub handle_radius: f32,
    /// Gizmo scale per unit of camera distance in
    /// [`TranslationGizmo::follow_node`](crate::gizmo::TranslationGizmo::follow_node).
    pub size_factor: f32,
    /// RGBA colours of the X, Y and Z handles.
    pub axis_colors: [Vec4; 3],
    pub highlight_color: Vec4,
}

impl Default for GizmoSettings {
    fn default() -> Self {
        Self {
            handle_length: 1.0,
            handle_scale: 0.4,
            handle_radius: 0.1,
            size_factor: 0.1,
            axis_colors: [
                Vec4::new(1.0, 0.0, 0.0, 1.0),
                Vec4::new(0.0, 1.0, 0.0, 1.0),
                Vec4::new(0.0, 0.0, 1.0, 1.0),
            ],
            highlight_color: DEFAULT_HIGHLIGHT_COLOR,
        }
    }
}

impl GizmoSettings {
    /// Parses settings from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings = serde_json::from_str(json)?;
        Ok(settings)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
