//! Error types for task domain validation.

use thiserror::Error;

/// Errors returned while constructing task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TodoDomainError {
    /// The store identifier is empty or contains a path separator.
    #[error("invalid task identifier '{0}'")]
    InvalidId(String),

    /// The task text is empty after trimming.
    #[error("task text must not be empty")]
    EmptyText,

    /// An update named no fields.
    #[error("an update must change at least one field")]
    EmptyPatch,
}
