//! Manipulation Gizmos
//!
//! Interactive 3D manipulators that turn picking rays into constrained node
//! motion:
//! - [`TranslationHandle`]: one axis, with ray hit testing and the
//!   plane-constrained hit position along the axis
//! - [`TranslationGizmo`]: three handles plus the Idle/Dragging state machine
//!   that moves the selected node
//!
//! Hit testing and dragging must be fed the same [`Ray`](crate::math::Ray)
//! value for one input sample.

pub mod handle;
pub mod translation;

pub use handle::{GizmoFrame, TranslationHandle};
pub use translation::{HandleDraw, TranslationGizmo};

/// One of the three gizmo axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GizmoAxis {
    X,
    Y,
    Z,
}

impl GizmoAxis {
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Position of the axis in [`GizmoAxis::ALL`].
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}
