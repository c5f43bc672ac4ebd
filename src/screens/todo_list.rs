//! Task list screen: the signed-in user's tasks with inline editing.

use super::{AddTodoModal, ScreenError, ScreenLifetime, ScreenResult, error::settle};
use crate::account::{domain::UserId, ports::IdentityProvider, services::SessionService};
use crate::todo::{
    domain::{Todo, TodoId, TodoPatch},
    ports::TodoStore,
    services::TodoService,
};
use mockable::Clock;
use tracing::{debug, info};

/// Loading phase of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// First fetch in flight; nothing to show yet.
    Loading,
    /// Re-fetch in flight; the previous rows stay visible.
    Refreshing,
    /// Rows reflect the last successful fetch.
    Ready,
    /// The email address is unverified, so tasks are not fetched.
    AwaitingVerification,
}

/// Display mode of a single row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowMode {
    /// Read-only text with a checkbox.
    Viewing,
    /// Text field holding an unsaved draft.
    Editing {
        /// The text being typed.
        draft: String,
    },
}

/// One task as shown on the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoRow {
    todo: Todo,
    mode: RowMode,
}

impl TodoRow {
    const fn viewing(todo: Todo) -> Self {
        Self {
            todo,
            mode: RowMode::Viewing,
        }
    }

    /// Returns the task shown in this row.
    #[must_use]
    pub const fn todo(&self) -> &Todo {
        &self.todo
    }

    /// Returns the row's display mode.
    #[must_use]
    pub const fn mode(&self) -> &RowMode {
        &self.mode
    }

    /// Returns `true` while the row is being edited.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        matches!(self.mode, RowMode::Editing { .. })
    }
}

/// What the shell should do with a hardware back press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackPressOutcome {
    /// Ask the user to confirm leaving the app.
    ConfirmExit,
    /// Let the shell apply its default behaviour.
    NotHandled,
}

/// View-model for the task list.
pub struct TodoListScreen<I, S, C>
where
    I: IdentityProvider,
    S: TodoStore,
    C: Clock + Send + Sync,
{
    session: SessionService<I>,
    todos: TodoService<S, C>,
    rows: Vec<TodoRow>,
    load_state: LoadState,
    error_message: Option<String>,
    add_modal: AddTodoModal,
    lifetime: ScreenLifetime,
}

impl<I, S, C> TodoListScreen<I, S, C>
where
    I: IdentityProvider,
    S: TodoStore,
    C: Clock + Send + Sync,
{
    /// Creates the screen in the [`LoadState::Loading`] state with no rows.
    #[must_use]
    pub fn new(session: SessionService<I>, todos: TodoService<S, C>) -> Self {
        Self {
            session,
            todos,
            rows: Vec::new(),
            load_state: LoadState::Loading,
            error_message: None,
            add_modal: AddTodoModal::new(),
            lifetime: ScreenLifetime::new(),
        }
    }

    /// Returns the rows in display order.
    #[must_use]
    pub fn rows(&self) -> &[TodoRow] {
        &self.rows
    }

    /// Returns the row for `id`, if shown.
    #[must_use]
    pub fn row(&self, id: &TodoId) -> Option<&TodoRow> {
        self.rows.iter().find(|row| row.todo.id() == id)
    }

    /// Returns the loading phase.
    #[must_use]
    pub const fn load_state(&self) -> LoadState {
        self.load_state
    }

    /// Returns the message from the last failed action, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Returns the add-task modal.
    #[must_use]
    pub const fn add_modal(&self) -> &AddTodoModal {
        &self.add_modal
    }

    /// Returns the add-task modal for text entry.
    pub const fn add_modal_mut(&mut self) -> &mut AddTodoModal {
        &mut self.add_modal
    }

    /// Returns a handle that tears the screen down when closed.
    #[must_use]
    pub fn lifetime(&self) -> ScreenLifetime {
        self.lifetime.clone()
    }

    /// Tears the screen down; pending and later actions return
    /// [`ScreenError::Closed`].
    pub fn close(&self) {
        self.lifetime.close();
    }

    /// Runs when the screen becomes active.
    ///
    /// Shows the verification gate for unverified users, otherwise fetches
    /// the list.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::Session`] without a signed-in user and any
    /// fetch failure.
    pub async fn enter(&mut self) -> ScreenResult<()> {
        self.ensure_open()?;
        let user = self.session.require_user()?;
        if !user.email_verified() {
            debug!(user_id = %user.id(), "email unverified, holding task fetch");
            self.load_state = LoadState::AwaitingVerification;
            return Ok(());
        }
        self.load_state = LoadState::Loading;
        self.fetch(user.id()).await
    }

    /// Reloads the user and fetches the list once the email is verified.
    ///
    /// Returns whether the email is now verified.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::Session`] when the user cannot be reloaded and
    /// any fetch failure.
    pub async fn check_verification(&mut self) -> ScreenResult<bool> {
        let reloaded = self.lifetime.run(self.session.reload_user()).await;
        let user = settle(&mut self.error_message, reloaded)?;
        if !user.email_verified() {
            self.load_state = LoadState::AwaitingVerification;
            return Ok(false);
        }
        self.load_state = LoadState::Loading;
        self.fetch(user.id()).await?;
        Ok(true)
    }

    /// Sends another verification email.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::Session`] when the provider refuses.
    pub async fn send_verification_email(&mut self) -> ScreenResult<()> {
        let sent = self
            .lifetime
            .run(self.session.send_verification_email())
            .await;
        settle(&mut self.error_message, sent)
    }

    /// Re-fetches the list, replacing every row.
    ///
    /// # Errors
    ///
    /// Returns any fetch failure; the previous rows stay visible.
    pub async fn refresh(&mut self) -> ScreenResult<()> {
        self.ensure_open()?;
        let owner = self.owner()?;
        self.load_state = LoadState::Refreshing;
        self.fetch(&owner).await
    }

    async fn fetch(&mut self, owner: &UserId) -> ScreenResult<()> {
        let fetched = self.lifetime.run(self.todos.list(owner)).await;
        if matches!(fetched, Err(ScreenError::Closed)) {
            return Err(ScreenError::Closed);
        }
        self.load_state = LoadState::Ready;
        let todos = settle(&mut self.error_message, fetched)?;
        debug!(count = todos.len(), "task list loaded");
        self.rows = todos.into_iter().map(TodoRow::viewing).collect();
        Ok(())
    }

    /// Flips a task's checkbox.
    ///
    /// # Errors
    ///
    /// See [`Self::set_completed`].
    pub async fn toggle_completed(&mut self, id: &TodoId) -> ScreenResult<()> {
        let current = self
            .row(id)
            .map(|row| row.todo.completed())
            .ok_or_else(|| ScreenError::UnknownTodo(id.clone()))?;
        self.set_completed(id, !current).await
    }

    /// Checks or unchecks a task.
    ///
    /// The row changes immediately and is rolled back if the store rejects
    /// the write.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::UnknownTodo`] for a task not on the list and
    /// any store failure.
    pub async fn set_completed(&mut self, id: &TodoId, completed: bool) -> ScreenResult<()> {
        self.ensure_open()?;
        let owner = self.owner()?;
        let previous = self.row_mut(id)?.todo.completed();
        self.patch_row(id, &TodoPatch::new().with_completed(completed));

        let saved = self
            .lifetime
            .run(self.todos.set_completed(&owner, id, completed))
            .await;
        match settle(&mut self.error_message, saved) {
            Ok(todo) => {
                self.replace_todo(todo);
                Ok(())
            }
            Err(err) => {
                self.patch_row(id, &TodoPatch::new().with_completed(previous));
                Err(err)
            }
        }
    }

    /// Switches a row to editing. Any other row being edited returns to
    /// viewing and loses its draft.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::UnknownTodo`] for a task not on the list.
    pub fn start_edit(&mut self, id: &TodoId) -> ScreenResult<()> {
        if self.row(id).is_none() {
            return Err(ScreenError::UnknownTodo(id.clone()));
        }
        for row in &mut self.rows {
            if row.todo.id() != id {
                row.mode = RowMode::Viewing;
            } else if !row.is_editing() {
                row.mode = RowMode::Editing {
                    draft: row.todo.text().as_str().to_owned(),
                };
            }
        }
        Ok(())
    }

    /// Replaces the draft of a row being edited.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::NotEditing`] when the row is not in edit mode.
    pub fn edit_draft(&mut self, id: &TodoId, text: impl Into<String>) -> ScreenResult<()> {
        match &mut self.row_mut(id)?.mode {
            RowMode::Editing { draft } => {
                *draft = text.into();
                Ok(())
            }
            RowMode::Viewing => Err(ScreenError::NotEditing(id.clone())),
        }
    }

    /// Drops a row's draft and returns it to viewing.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::UnknownTodo`] for a task not on the list.
    pub fn cancel_edit(&mut self, id: &TodoId) -> ScreenResult<()> {
        self.row_mut(id)?.mode = RowMode::Viewing;
        Ok(())
    }

    /// Persists a row's draft as the task text.
    ///
    /// The row stays in edit mode with its draft when the save fails.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::NotEditing`] when the row is not in edit mode,
    /// a validation error for blank text and any store failure.
    pub async fn save_edit(&mut self, id: &TodoId) -> ScreenResult<()> {
        let owner = self.owner()?;
        let draft = match &self.row_mut(id)?.mode {
            RowMode::Editing { draft } => draft.clone(),
            RowMode::Viewing => return Err(ScreenError::NotEditing(id.clone())),
        };
        let saved = self
            .lifetime
            .run(self.todos.rename(&owner, id, &draft))
            .await;
        let todo = settle(&mut self.error_message, saved)?;
        self.replace_todo(todo);
        self.row_mut(id)?.mode = RowMode::Viewing;
        Ok(())
    }

    /// Deletes a task, removing its row once the store confirms.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::UnknownTodo`] for a task not on the list and
    /// any store failure.
    pub async fn delete(&mut self, id: &TodoId) -> ScreenResult<()> {
        let owner = self.owner()?;
        if self.row(id).is_none() {
            return Err(ScreenError::UnknownTodo(id.clone()));
        }
        let deleted = self.lifetime.run(self.todos.delete(&owner, id)).await;
        settle(&mut self.error_message, deleted)?;
        self.rows.retain(|row| row.todo.id() != id);
        Ok(())
    }

    /// Shows the add-task modal.
    pub fn open_add_modal(&mut self) {
        self.add_modal.open();
    }

    /// Submits the add-task modal and creates the task.
    ///
    /// The modal closes only once the task is stored.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank text and any store failure; in
    /// both cases the modal stays open with the typed text.
    pub async fn submit_add_modal(&mut self) -> ScreenResult<()> {
        let text = self.add_modal.submit()?;
        let owner = self.owner()?;
        let added = self.lifetime.run(self.todos.add_text(&owner, text)).await;
        self.push_added(added)?;
        self.add_modal.dismiss();
        Ok(())
    }

    /// Creates a task from raw text.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank text and any store failure.
    pub async fn add(&mut self, text: &str) -> ScreenResult<()> {
        let owner = self.owner()?;
        let added = self.lifetime.run(self.todos.add(&owner, text)).await;
        self.push_added(added)
    }

    fn push_added(&mut self, added: ScreenResult<Todo>) -> ScreenResult<()> {
        let todo = settle(&mut self.error_message, added)?;
        info!(todo_id = %todo.id(), "task added to list");
        self.rows.push(TodoRow::viewing(todo));
        Ok(())
    }

    /// Decides how a hardware back press is handled.
    #[must_use]
    pub const fn handle_back_press(&self, focused: bool) -> BackPressOutcome {
        if focused {
            BackPressOutcome::ConfirmExit
        } else {
            BackPressOutcome::NotHandled
        }
    }

    fn ensure_open(&self) -> ScreenResult<()> {
        if self.lifetime.is_closed() {
            return Err(ScreenError::Closed);
        }
        Ok(())
    }

    fn owner(&self) -> ScreenResult<UserId> {
        Ok(self.session.require_user()?.id().clone())
    }

    fn row_mut(&mut self, id: &TodoId) -> ScreenResult<&mut TodoRow> {
        self.rows
            .iter_mut()
            .find(|row| row.todo.id() == id)
            .ok_or_else(|| ScreenError::UnknownTodo(id.clone()))
    }

    fn patch_row(&mut self, id: &TodoId, patch: &TodoPatch) {
        if let Some(row) = self.rows.iter_mut().find(|row| row.todo.id() == id) {
            row.todo.apply(patch);
        }
    }

    fn replace_todo(&mut self, todo: Todo) {
        if let Some(row) = self.rows.iter_mut().find(|row| row.todo.id() == todo.id()) {
            row.todo = todo;
        }
    }
}
