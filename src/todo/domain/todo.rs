//! Task aggregate and write models.

use super::{TodoDomainError, TodoId, TodoText};
use crate::account::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A task owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    id: TodoId,
    text: TodoText,
    completed: bool,
    owner: UserId,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a stored task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTodoData {
    /// Store-assigned identifier.
    pub id: TodoId,
    /// Stored text.
    pub text: TodoText,
    /// Stored completion flag.
    pub completed: bool,
    /// Owning user.
    pub owner: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// Reconstructs a task from storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTodoData) -> Self {
        Self {
            id: data.id,
            text: data.text,
            completed: data.completed,
            owner: data.owner,
            created_at: data.created_at,
        }
    }

    /// Materialises a new task once the store has assigned its identifier.
    #[must_use]
    pub fn from_new(id: TodoId, new: NewTodo) -> Self {
        Self {
            id,
            text: new.text,
            completed: false,
            owner: new.owner,
            created_at: new.created_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &TodoId {
        &self.id
    }

    /// Returns the task text.
    #[must_use]
    pub const fn text(&self) -> &TodoText {
        &self.text
    }

    /// Returns `true` once the task is checked off.
    #[must_use]
    pub const fn completed(&self) -> bool {
        self.completed
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns `true` when `user` owns this task.
    #[must_use]
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner == user
    }

    /// Merges `patch` into this task, leaving unspecified fields untouched.
    pub fn apply(&mut self, patch: &TodoPatch) {
        if let Some(text) = patch.text() {
            self.text = text.clone();
        }
        if let Some(completed) = patch.completed() {
            self.completed = completed;
        }
    }
}

/// A task to be created; the store assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    owner: UserId,
    text: TodoText,
    created_at: DateTime<Utc>,
}

impl NewTodo {
    /// Creates an unchecked task for `owner`, stamped with the clock's time.
    #[must_use]
    pub fn new(owner: UserId, text: TodoText, clock: &impl Clock) -> Self {
        Self {
            owner,
            text,
            created_at: clock.utc(),
        }
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Returns the task text.
    #[must_use]
    pub const fn text(&self) -> &TodoText {
        &self.text
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Merge update naming only the fields to change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    text: Option<TodoText>,
    completed: Option<bool>,
}

impl TodoPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the replacement text.
    #[must_use]
    pub fn with_text(mut self, text: TodoText) -> Self {
        self.text = Some(text);
        self
    }

    /// Sets the completion flag.
    #[must_use]
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Returns the replacement text, if any.
    #[must_use]
    pub const fn text(&self) -> Option<&TodoText> {
        self.text.as_ref()
    }

    /// Returns the completion flag, if any.
    #[must_use]
    pub const fn completed(&self) -> Option<bool> {
        self.completed
    }

    /// Returns `true` when the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.text.is_none() && self.completed.is_none()
    }

    /// Returns the stored field names this patch writes.
    #[must_use]
    pub fn field_paths(&self) -> Vec<&'static str> {
        let mut paths = Vec::with_capacity(2);
        if self.text.is_some() {
            paths.push("text");
        }
        if self.completed.is_some() {
            paths.push("completed");
        }
        paths
    }

    /// Rejects empty patches.
    ///
    /// # Errors
    ///
    /// Returns [`TodoDomainError::EmptyPatch`] when no field is set.
    pub fn ensure_not_empty(&self) -> Result<(), TodoDomainError> {
        if self.is_empty() {
            return Err(TodoDomainError::EmptyPatch);
        }
        Ok(())
    }
}
