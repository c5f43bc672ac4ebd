//! Account deletion: re-authenticate, remove the user's tasks, then the user.

use super::{SessionError, SessionService};
use crate::account::{
    domain::{Password, UserId},
    ports::{IdentityError, IdentityProvider},
};
use crate::todo::{
    ports::TodoStore,
    services::{TodoService, TodoServiceError},
};
use mockable::Clock;
use thiserror::Error;
use tracing::{error, info};

/// Errors returned while deleting an account.
#[derive(Debug, Clone, Error)]
pub enum AccountDeletionError {
    /// No current password was entered; nothing was sent to the provider.
    #[error("Must enter the current password to delete the account")]
    MissingCurrentPassword,

    /// Re-authentication or another session step failed; nothing was deleted.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Removing the user's tasks failed; the account still exists.
    #[error("could not remove tasks, the account was kept: {0}")]
    TaskCleanup(#[source] TodoServiceError),

    /// Tasks were removed but the account itself could not be deleted.
    #[error("removed {removed_tasks} tasks but could not delete the account: {source}")]
    PartialDeletion {
        /// Number of tasks already removed.
        removed_tasks: usize,
        /// Identity provider failure.
        source: IdentityError,
    },
}

/// Outcome of a successful account deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionReport {
    /// The deleted user.
    pub user_id: UserId,
    /// Number of tasks removed with the account.
    pub removed_tasks: usize,
}

/// Orchestrates account deletion across the identity provider and the task
/// store. Tasks are removed before the user record so no task outlives its
/// owner.
pub struct AccountDeletionService<I, S, C>
where
    I: IdentityProvider,
    S: TodoStore,
    C: Clock + Send + Sync,
{
    session: SessionService<I>,
    todos: TodoService<S, C>,
}

impl<I, S, C> Clone for AccountDeletionService<I, S, C>
where
    I: IdentityProvider,
    S: TodoStore,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            todos: self.todos.clone(),
        }
    }
}

impl<I, S, C> AccountDeletionService<I, S, C>
where
    I: IdentityProvider,
    S: TodoStore,
    C: Clock + Send + Sync,
{
    /// Creates a new account deletion service.
    #[must_use]
    pub const fn new(session: SessionService<I>, todos: TodoService<S, C>) -> Self {
        Self { session, todos }
    }

    /// Deletes the signed-in account and every task it owns.
    ///
    /// # Errors
    ///
    /// Returns [`AccountDeletionError::MissingCurrentPassword`] for empty
    /// input before any remote call, [`AccountDeletionError::Session`] when
    /// re-authentication fails, [`AccountDeletionError::TaskCleanup`] when
    /// the tasks cannot be removed and [`AccountDeletionError::PartialDeletion`]
    /// when the tasks are gone but the account remains.
    pub async fn delete_account(
        &self,
        current_password: &str,
    ) -> Result<DeletionReport, AccountDeletionError> {
        let password = Password::new(current_password)
            .map_err(|_| AccountDeletionError::MissingCurrentPassword)?;
        let user = self.session.reauthenticate(&password).await?;
        let user_id = user.id().clone();

        let removed_tasks = self
            .todos
            .delete_all(&user_id)
            .await
            .map_err(AccountDeletionError::TaskCleanup)?;

        if let Err(source) = self.session.delete_user().await {
            error!(
                user_id = %user_id,
                removed_tasks,
                error = %source,
                "account deletion left the user record behind"
            );
            return Err(AccountDeletionError::PartialDeletion {
                removed_tasks,
                source,
            });
        }

        info!(user_id = %user_id, removed_tasks, "account deleted");
        Ok(DeletionReport {
            user_id,
            removed_tasks,
        })
    }
}
