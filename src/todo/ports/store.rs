//! Document store port for owner-scoped task records.

use crate::account::domain::UserId;
use crate::todo::domain::{NewTodo, Todo, TodoId, TodoPatch};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TodoStoreResult<T> = Result<T, TodoStoreError>;

/// Task persistence contract.
///
/// Every operation acts on behalf of `owner`; implementations must not read
/// or change tasks belonging to anyone else.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Returns every task owned by `owner`, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns [`TodoStoreError::Network`] or
    /// [`TodoStoreError::Persistence`] when the store cannot answer.
    async fn list(&self, owner: &UserId) -> TodoStoreResult<Vec<Todo>>;

    /// Stores a new task and returns it with its assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TodoStoreError::Unauthenticated`] without a session.
    async fn add(&self, todo: NewTodo) -> TodoStoreResult<Todo>;

    /// Merges `patch` into an existing task and returns the result.
    ///
    /// Fields absent from the patch keep their stored values. Never creates
    /// a task.
    ///
    /// # Errors
    ///
    /// Returns [`TodoStoreError::NotFound`] for a missing task and
    /// [`TodoStoreError::PermissionDenied`] for a task owned by another user.
    async fn update(&self, owner: &UserId, id: &TodoId, patch: &TodoPatch)
    -> TodoStoreResult<Todo>;

    /// Removes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TodoStoreError::NotFound`] for a missing task and
    /// [`TodoStoreError::PermissionDenied`] for a task owned by another user.
    async fn delete(&self, owner: &UserId, id: &TodoId) -> TodoStoreResult<()>;

    /// Removes every task owned by `owner` and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`TodoStoreError::PartialBatch`] when some tasks were removed
    /// before a failure.
    async fn delete_all(&self, owner: &UserId) -> TodoStoreResult<usize>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TodoStoreError {
    /// The task does not exist.
    #[error("task not found: {0}")]
    NotFound(TodoId),

    /// The task belongs to a different user.
    #[error("permission denied for task {0}")]
    PermissionDenied(TodoId),

    /// The store rejected the caller's credentials.
    #[error("not signed in to the task store")]
    Unauthenticated,

    /// The store could not be reached.
    #[error("network error: {0}")]
    Network(Arc<dyn std::error::Error + Send + Sync>),

    /// The store answered with something this client cannot use.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),

    /// A bulk delete stopped part way through.
    #[error("bulk delete stopped after {deleted} tasks: {source}")]
    PartialBatch {
        /// Tasks removed before the failure.
        deleted: usize,
        /// The failure that stopped the batch.
        source: Box<TodoStoreError>,
    },
}

impl TodoStoreError {
    /// Wraps a transport failure.
    pub fn network(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Network(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
