//! Add-task modal state.

use crate::todo::domain::{TodoDomainError, TodoText};

/// Text entry modal for new tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddTodoModal {
    visible: bool,
    text: String,
    error_message: Option<String>,
}

impl AddTodoModal {
    /// Creates a hidden, empty modal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows the modal.
    pub fn open(&mut self) {
        self.visible = true;
    }

    /// Hides the modal and discards the typed text.
    pub fn dismiss(&mut self) {
        self.visible = false;
        self.text.clear();
        self.error_message = None;
    }

    /// Replaces the typed text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Returns the typed text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns `true` while the modal is shown.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Returns the validation message from the last submit, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Validates the typed text and hands it back.
    ///
    /// The modal stays open with its text until [`Self::dismiss`], so a
    /// failed save keeps what the user typed.
    ///
    /// # Errors
    ///
    /// Returns [`TodoDomainError::EmptyText`] for blank input, with the
    /// message shown.
    pub fn submit(&mut self) -> Result<TodoText, TodoDomainError> {
        match TodoText::new(&self.text) {
            Ok(text) => {
                self.error_message = None;
                Ok(text)
            }
            Err(err) => {
                self.error_message = Some(err.to_string());
                Err(err)
            }
        }
    }
}
