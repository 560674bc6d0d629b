//! Error Types
//!
//! This module defines the error types used throughout the editor core.
//!
//! # Overview
//!
//! Most "nothing happened" outcomes are not errors here: a non-duplicable
//! node yields `None` from [`Scene::duplicate`](crate::scene::Scene::duplicate),
//! a ray that misses every gizmo handle yields `None` from hit testing.
//! [`SceneError`] is reserved for structural-integrity violations and
//! invalid input:
//! - Hierarchy cycles and attempts to move the root node
//! - Stale or foreign node handles
//! - Malformed animation data
//! - Unparseable settings
//!
//! # Usage
//!
//! Fallible APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, SceneError>`.
//!
//! ```rust,ignore
//! use prism::errors::Result;
//!
//! fn reparent(scene: &mut Scene, parent: NodeHandle, child: NodeHandle) -> Result<()> {
//!     scene.add_child(parent, child, true)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::scene::{NodeHandle, NodeId};

/// The main error type for the editor core.
#[derive(Error, Debug)]
pub enum SceneError {
    // ========================================================================
    // Hierarchy Errors
    // ========================================================================
    /// The handle does not refer to a live node in this scene.
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeHandle),

    /// Attaching `child` under `parent` would make a node its own ancestor.
    #[error("Hierarchy cycle: node {child} cannot be attached under its descendant {parent}")]
    HierarchyCycle {
        /// Identifier of the node being attached
        child: NodeId,
        /// Identifier of the requested parent
        parent: NodeId,
    },

    /// The node is not a direct child of the given parent.
    #[error("Node {child} is not a child of node {parent}")]
    NotAChild {
        /// Identifier of the requested parent
        parent: NodeId,
        /// Identifier of the node being removed
        child: NodeId,
    },

    /// The scene root cannot be re-parented, detached, or destroyed.
    #[error("The root node cannot be moved or removed")]
    RootNodeImmutable,

    // ========================================================================
    // Animation Errors
    // ========================================================================
    /// Animation index out of bounds.
    #[error("Animation index out of range: {index} (count: {count})")]
    AnimationIndexOutOfRange {
        /// The invalid index
        index: usize,
        /// Number of animations on the node
        count: usize,
    },

    /// A keyframe track was built without keys.
    #[error("Keyframe track is empty")]
    EmptyTrack,

    /// Keyframe times and values disagree in length.
    #[error("Keyframe track mismatch: {times} times but {values} values (expected {expected})")]
    TrackLengthMismatch {
        /// Number of key times
        times: usize,
        /// Number of key values
        values: usize,
        /// Number of values the interpolation mode requires
        expected: usize,
    },

    // ========================================================================
    // Settings Errors
    // ========================================================================
    /// JSON parsing error.
    #[error("Settings parse error: {0}")]
    SettingsError(#[from] serde_json::Error),
}

/// Alias for `Result<T, SceneError>`.
pub type Result<T> = std::result::Result<T, SceneError>;
