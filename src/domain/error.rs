//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violated preconditions of a tree operation.
/// A failed operation never leaves the tree partially modified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComponentError {
    #[error("{parent} component already has {child} as a child")]
    DuplicateChild { parent: String, child: String },

    #[error("{child} component does not exist in {parent}")]
    MissingChild { parent: String, child: String },

    #[error("component path not found: {0}")]
    PathNotFound(String),

    #[error("root component not found in layout: {0}")]
    RootNotFound(String),

    #[error("invalid component {name}: {reason}")]
    InvalidComponent { name: String, reason: String },

    #[error("component already attached to a parent: {0}")]
    AlreadyAttached(String),

    #[error("cycle detected: {0} cannot be placed below itself")]
    CycleDetected(String),

    #[error("component handle no longer refers to a node in this tree")]
    StaleComponent,

    #[error("attribute is reserved for tree structure: {0}")]
    ReservedAttribute(String),
}

/// Result type for tree operations.
pub type ComponentResult<T> = Result<T, ComponentError>;
