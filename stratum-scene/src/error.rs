//! Error types for scene-graph operations.

use thiserror::Error;

/// Errors that can occur while mutating a scene.
#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("Unknown group: #{0}")]
    UnknownGroup(u64),

    #[error("Unknown primitive: #{0}")]
    UnknownPrimitive(u64),

    #[error("Primitive #{primitive} is not a child of group #{group}")]
    NotAChild { group: u64, primitive: u64 },

    #[error("Primitive #{primitive} already belongs to group #{group}")]
    AlreadyParented { group: u64, primitive: u64 },

    #[error("Primitive #{primitive} is still a child of group #{group}")]
    StillParented { group: u64, primitive: u64 },

    #[error("Group #{group} still owns {children} primitive(s)")]
    GroupNotEmpty { group: u64, children: usize },

    #[error("Primitive #{primitive} has {expected} cells, got {actual} colors")]
    ColorCountMismatch {
        primitive: u64,
        expected: usize,
        actual: usize,
    },

    #[error("Primitive #{0} cannot carry per-cell colors")]
    NotAGrid(u64),
}
