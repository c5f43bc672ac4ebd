//! Service layer for creating, changing and removing a user's tasks.

use crate::account::domain::UserId;
use crate::todo::{
    domain::{NewTodo, Todo, TodoDomainError, TodoId, TodoPatch, TodoText},
    ports::{TodoStore, TodoStoreError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Service-level errors for task operations.
#[derive(Debug, Clone, Error)]
pub enum TodoServiceError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] TodoDomainError),
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] TodoStoreError),
}

/// Result type for task service operations.
pub type TodoServiceResult<T> = Result<T, TodoServiceError>;

/// Task orchestration service.
///
/// Validates input before any remote call and presents listings in creation
/// order, since the store guarantees none.
pub struct TodoService<S, C>
where
    S: TodoStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> Clone for TodoService<S, C>
where
    S: TodoStore,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, C> TodoService<S, C>
where
    S: TodoStore,
    C: Clock + Send + Sync,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Returns the owner's tasks, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TodoServiceError::Store`] when the store cannot be read.
    pub async fn list(&self, owner: &UserId) -> TodoServiceResult<Vec<Todo>> {
        let mut todos = self.store.list(owner).await?;
        todos.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(todos)
    }

    /// Creates an unchecked task from raw input.
    ///
    /// # Errors
    ///
    /// Returns [`TodoDomainError::EmptyText`] for blank input, without
    /// calling the store.
    pub async fn add(&self, owner: &UserId, text: &str) -> TodoServiceResult<Todo> {
        let validated = TodoText::new(text)?;
        self.add_text(owner, validated).await
    }

    /// Creates an unchecked task from validated text.
    ///
    /// # Errors
    ///
    /// Returns [`TodoServiceError::Store`] when the store rejects the write.
    pub async fn add_text(&self, owner: &UserId, text: TodoText) -> TodoServiceResult<Todo> {
        let created = self
            .store
            .add(NewTodo::new(owner.clone(), text, &*self.clock))
            .await?;
        debug!(todo_id = %created.id(), "task added");
        Ok(created)
    }

    /// Checks or unchecks a task.
    ///
    /// # Errors
    ///
    /// Returns [`TodoServiceError::Store`] for missing or foreign tasks.
    pub async fn set_completed(
        &self,
        owner: &UserId,
        id: &TodoId,
        completed: bool,
    ) -> TodoServiceResult<Todo> {
        self.update(owner, id, TodoPatch::new().with_completed(completed))
            .await
    }

    /// Replaces a task's text, keeping its completion state.
    ///
    /// # Errors
    ///
    /// Returns [`TodoDomainError::EmptyText`] for blank input and
    /// [`TodoServiceError::Store`] for missing or foreign tasks.
    pub async fn rename(&self, owner: &UserId, id: &TodoId, text: &str) -> TodoServiceResult<Todo> {
        let validated = TodoText::new(text)?;
        self.update(owner, id, TodoPatch::new().with_text(validated))
            .await
    }

    /// Merges `patch` into a task.
    ///
    /// # Errors
    ///
    /// Returns [`TodoDomainError::EmptyPatch`] when nothing would change.
    pub async fn update(
        &self,
        owner: &UserId,
        id: &TodoId,
        patch: TodoPatch,
    ) -> TodoServiceResult<Todo> {
        patch.ensure_not_empty()?;
        Ok(self.store.update(owner, id, &patch).await?)
    }

    /// Removes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TodoServiceError::Store`] for missing or foreign tasks.
    pub async fn delete(&self, owner: &UserId, id: &TodoId) -> TodoServiceResult<()> {
        self.store.delete(owner, id).await?;
        debug!(todo_id = %id, "task deleted");
        Ok(())
    }

    /// Removes every task the owner has.
    ///
    /// # Errors
    ///
    /// Returns [`TodoServiceError::Store`], possibly wrapping
    /// [`TodoStoreError::PartialBatch`].
    pub async fn delete_all(&self, owner: &UserId) -> TodoServiceResult<usize> {
        Ok(self.store.delete_all(owner).await?)
    }
}
