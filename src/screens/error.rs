//! Screen-level errors and the inline error message convention.

use crate::account::services::{AccountDeletionError, SessionError};
use crate::todo::{
    domain::{TodoDomainError, TodoId},
    services::TodoServiceError,
};
use thiserror::Error;
use tracing::warn;

/// Errors surfaced by screen operations.
#[derive(Debug, Clone, Error)]
pub enum ScreenError {
    /// The screen was torn down; the result was discarded.
    #[error("the screen has been closed")]
    Closed,

    /// A session operation failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A task operation failed.
    #[error(transparent)]
    Todo(#[from] TodoServiceError),

    /// Account deletion failed.
    #[error(transparent)]
    Deletion(#[from] AccountDeletionError),

    /// The task is not shown on this screen.
    #[error("task {0} is not on this list")]
    UnknownTodo(TodoId),

    /// The task row is not being edited.
    #[error("task {0} is not being edited")]
    NotEditing(TodoId),
}

impl From<TodoDomainError> for ScreenError {
    fn from(err: TodoDomainError) -> Self {
        Self::Todo(TodoServiceError::Domain(err))
    }
}

/// Result type for screen operations.
pub type ScreenResult<T> = Result<T, ScreenError>;

/// Records the outcome of a user action in the screen's message slot.
///
/// Success clears the previous message, failure replaces it, and a closed
/// screen is left untouched.
pub(super) fn settle<T>(slot: &mut Option<String>, result: ScreenResult<T>) -> ScreenResult<T> {
    match &result {
        Ok(_) => *slot = None,
        Err(ScreenError::Closed) => {}
        Err(err) => {
            warn!(error = %err, "screen action failed");
            *slot = Some(err.to_string());
        }
    }
    result
}
