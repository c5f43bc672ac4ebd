//! Service layer for sign-in, re-authentication and password changes.

use crate::account::{
    domain::{AccountDomainError, EmailAddress, Password, User},
    ports::{IdentityError, IdentityProvider},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Service-level errors for session operations.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// Input validation failed before any remote call.
    #[error(transparent)]
    Domain(#[from] AccountDomainError),

    /// The current password did not re-authenticate the user.
    #[error("re-authentication failed: {0}")]
    ReauthenticationFailed(#[source] IdentityError),

    /// Identity provider operation failed.
    #[error(transparent)]
    Identity(#[from] IdentityError),
}

/// Result type for session service operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Session orchestration service wrapping an [`IdentityProvider`].
pub struct SessionService<I>
where
    I: IdentityProvider,
{
    identity: Arc<I>,
}

impl<I> Clone for SessionService<I>
where
    I: IdentityProvider,
{
    fn clone(&self) -> Self {
        Self {
            identity: Arc::clone(&self.identity),
        }
    }
}

impl<I> SessionService<I>
where
    I: IdentityProvider,
{
    /// Creates a new session service.
    #[must_use]
    pub const fn new(identity: Arc<I>) -> Self {
        Self { identity }
    }

    /// Signs in with raw form input.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Domain`] for a malformed email or empty
    /// password and [`IdentityError::InvalidCredentials`] for a mismatch.
    pub async fn sign_in(&self, email: &str, password: &str) -> SessionResult<User> {
        let address = EmailAddress::new(email)?;
        let secret = Password::new(password)?;
        let user = self.identity.sign_in(&address, &secret).await?;
        info!(user_id = %user.id(), "session started");
        Ok(user)
    }

    /// Ends the session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Identity`] when the provider fails.
    pub async fn sign_out(&self) -> SessionResult<()> {
        self.identity.sign_out().await?;
        Ok(())
    }

    /// Returns the signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.identity.current_user()
    }

    /// Returns the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::NotSignedIn`] without a session.
    pub fn require_user(&self) -> SessionResult<User> {
        self.current_user()
            .ok_or(SessionError::Identity(IdentityError::NotSignedIn))
    }

    /// Re-reads the signed-in user, picking up a newly verified email.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Identity`] when the provider fails.
    pub async fn reload_user(&self) -> SessionResult<User> {
        Ok(self.identity.reload_user().await?)
    }

    /// Requests a verification email for the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Identity`] when the provider fails.
    pub async fn send_verification_email(&self) -> SessionResult<()> {
        self.identity.send_verification_email().await?;
        Ok(())
    }

    /// Proves the signed-in user still knows their password by signing in
    /// again. A failure leaves the existing session untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ReauthenticationFailed`] when the provider
    /// rejects the password.
    pub async fn reauthenticate(&self, current_password: &Password) -> SessionResult<User> {
        let user = self.require_user()?;
        self.identity
            .sign_in(user.email(), current_password)
            .await
            .map_err(|err| {
                warn!(user_id = %user.id(), error = %err, "re-authentication rejected");
                SessionError::ReauthenticationFailed(err)
            })
    }

    /// Deletes the signed-in user record. Callers re-authenticate first.
    pub(crate) async fn delete_user(&self) -> Result<(), IdentityError> {
        self.identity.delete_user().await
    }

    /// Re-authenticates with `current_password`, then sets `new_password`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Domain`] for empty input,
    /// [`SessionError::ReauthenticationFailed`] for a wrong current password
    /// and [`IdentityError::WeakPassword`] when the provider rejects the new
    /// one.
    pub async fn change_password(
        &self,
        current_password: &str,
        new_password: &str,
    ) -> SessionResult<()> {
        let current = Password::new(current_password)?;
        let replacement = Password::new(new_password)?;
        let user = self.reauthenticate(&current).await?;
        self.identity.update_password(&replacement).await?;
        info!(user_id = %user.id(), "password changed");
        Ok(())
    }
}
