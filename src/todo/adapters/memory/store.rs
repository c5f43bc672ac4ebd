//! In-memory task store for tests and offline demos.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::account::domain::UserId;
use crate::todo::{
    domain::{NewTodo, Todo, TodoId, TodoPatch},
    ports::{TodoStore, TodoStoreError, TodoStoreResult},
};

/// Thread-safe in-memory task store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTodoStore {
    state: Arc<RwLock<HashMap<TodoId, Todo>>>,
}

fn poisoned(err: impl std::fmt::Display) -> TodoStoreError {
    TodoStoreError::persistence(std::io::Error::other(err.to_string()))
}

/// Returns the owned task or the matching not-found/permission error.
fn owned_mut<'a>(
    todos: &'a mut HashMap<TodoId, Todo>,
    owner: &UserId,
    id: &TodoId,
) -> TodoStoreResult<&'a mut Todo> {
    let todo = todos
        .get_mut(id)
        .ok_or_else(|| TodoStoreError::NotFound(id.clone()))?;
    if !todo.is_owned_by(owner) {
        return Err(TodoStoreError::PermissionDenied(id.clone()));
    }
    Ok(todo)
}

impl InMemoryTodoStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of stored tasks across all owners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.read().map(|todos| todos.len()).unwrap_or(0)
    }

    /// Returns `true` if no tasks are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    async fn list(&self, owner: &UserId) -> TodoStoreResult<Vec<Todo>> {
        let todos = self.state.read().map_err(poisoned)?;
        Ok(todos
            .values()
            .filter(|todo| todo.is_owned_by(owner))
            .cloned()
            .collect())
    }

    async fn add(&self, todo: NewTodo) -> TodoStoreResult<Todo> {
        let id = TodoId::new(Uuid::new_v4().simple().to_string())
            .map_err(TodoStoreError::persistence)?;
        let created = Todo::from_new(id, todo);
        let mut todos = self.state.write().map_err(poisoned)?;
        todos.insert(created.id().clone(), created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        owner: &UserId,
        id: &TodoId,
        patch: &TodoPatch,
    ) -> TodoStoreResult<Todo> {
        let mut todos = self.state.write().map_err(poisoned)?;
        let todo = owned_mut(&mut todos, owner, id)?;
        todo.apply(patch);
        Ok(todo.clone())
    }

    async fn delete(&self, owner: &UserId, id: &TodoId) -> TodoStoreResult<()> {
        let mut todos = self.state.write().map_err(poisoned)?;
        owned_mut(&mut todos, owner, id)?;
        todos.remove(id);
        Ok(())
    }

    async fn delete_all(&self, owner: &UserId) -> TodoStoreResult<usize> {
        let mut todos = self.state.write().map_err(poisoned)?;
        let before = todos.len();
        todos.retain(|_, todo| !todo.is_owned_by(owner));
        Ok(before - todos.len())
    }
}
