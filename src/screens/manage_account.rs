//! Account management screen: password change, account deletion, logout.

use super::{ScreenLifetime, ScreenResult, error::settle};
use crate::account::{
    ports::IdentityProvider,
    services::{AccountDeletionService, SessionService},
};
use crate::todo::ports::TodoStore;
use mockable::Clock;
use tracing::info;

/// Where the shell should navigate after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Remain on this screen.
    Stay,
    /// Return to the previous screen.
    Back,
    /// Unwind to the root screen; the session is gone.
    PopToTop,
}

/// View-model for the account management screen.
///
/// The password fields are plain text buffers bound to the form inputs. The
/// message from the last failed action stays until the next attempt.
pub struct ManageAccountScreen<I, S, C>
where
    I: IdentityProvider,
    S: TodoStore,
    C: Clock + Send + Sync,
{
    session: SessionService<I>,
    deletion: AccountDeletionService<I, S, C>,
    current_password: String,
    new_password: String,
    error_message: Option<String>,
    lifetime: ScreenLifetime,
}

impl<I, S, C> ManageAccountScreen<I, S, C>
where
    I: IdentityProvider,
    S: TodoStore,
    C: Clock + Send + Sync,
{
    /// Creates the screen with empty fields.
    #[must_use]
    pub fn new(session: SessionService<I>, deletion: AccountDeletionService<I, S, C>) -> Self {
        Self {
            session,
            deletion,
            current_password: String::new(),
            new_password: String::new(),
            error_message: None,
            lifetime: ScreenLifetime::new(),
        }
    }

    /// Replaces the current-password field.
    pub fn set_current_password(&mut self, value: impl Into<String>) {
        self.current_password = value.into();
    }

    /// Replaces the new-password field.
    pub fn set_new_password(&mut self, value: impl Into<String>) {
        self.new_password = value.into();
    }

    /// Returns `true` when the current-password field holds text.
    #[must_use]
    pub fn has_current_password(&self) -> bool {
        !self.current_password.is_empty()
    }

    /// Returns `true` when the new-password field holds text.
    #[must_use]
    pub fn has_new_password(&self) -> bool {
        !self.new_password.is_empty()
    }

    /// Returns the message from the last failed action, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Returns a handle that tears the screen down when closed.
    #[must_use]
    pub fn lifetime(&self) -> ScreenLifetime {
        self.lifetime.clone()
    }

    /// Tears the screen down.
    pub fn close(&self) {
        self.lifetime.close();
    }

    /// Re-authenticates with the current password and sets the new one.
    /// Both fields are cleared on success.
    ///
    /// # Errors
    ///
    /// Returns [`super::ScreenError::Session`] for empty fields, a wrong
    /// current password or a password the provider rejects.
    pub async fn change_password(&mut self) -> ScreenResult<Navigation> {
        let changed = self
            .lifetime
            .run(
                self.session
                    .change_password(&self.current_password, &self.new_password),
            )
            .await;
        settle(&mut self.error_message, changed)?;
        self.clear_fields();
        Ok(Navigation::Stay)
    }

    /// Deletes the account and every task it owns.
    ///
    /// # Errors
    ///
    /// Returns [`super::ScreenError::Deletion`], including the local
    /// missing-password failure that makes no remote call.
    pub async fn delete_account(&mut self) -> ScreenResult<Navigation> {
        let deleted = self
            .lifetime
            .run(self.deletion.delete_account(&self.current_password))
            .await;
        let report = settle(&mut self.error_message, deleted)?;
        info!(
            user_id = %report.user_id,
            removed_tasks = report.removed_tasks,
            "account closed from settings"
        );
        self.clear_fields();
        Ok(Navigation::PopToTop)
    }

    /// Signs out.
    ///
    /// # Errors
    ///
    /// Returns [`super::ScreenError::Session`] when the provider fails.
    pub async fn logout(&mut self) -> ScreenResult<Navigation> {
        let signed_out = self.lifetime.run(self.session.sign_out()).await;
        settle(&mut self.error_message, signed_out)?;
        self.clear_fields();
        Ok(Navigation::PopToTop)
    }

    /// Leaves the screen without changes.
    #[must_use]
    pub const fn back(&self) -> Navigation {
        Navigation::Back
    }

    fn clear_fields(&mut self) {
        self.current_password.clear();
        self.new_password.clear();
    }
}
