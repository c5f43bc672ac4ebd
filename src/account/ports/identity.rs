//! Identity provider port: credentials, sessions and user lifecycle.

use crate::account::domain::{EmailAddress, Password, User};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for identity provider operations.
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Contract for the hosted identity provider.
///
/// Implementations keep at most one signed-in session. Every operation except
/// [`IdentityProvider::current_user`] is a remote call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Signs in with email and password, replacing any existing session.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidCredentials`] for an unknown email or a
    /// wrong password. A failed sign-in leaves the existing session intact.
    async fn sign_in(&self, email: &EmailAddress, password: &Password) -> IdentityResult<User>;

    /// Clears the current session.
    ///
    /// # Errors
    ///
    /// Implementations that talk to the provider may return
    /// [`IdentityError::Network`].
    async fn sign_out(&self) -> IdentityResult<()>;

    /// Returns the signed-in user from the cached session.
    fn current_user(&self) -> Option<User>;

    /// Re-reads the signed-in user's record from the provider.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::NotSignedIn`] without a session.
    async fn reload_user(&self) -> IdentityResult<User>;

    /// Replaces the signed-in user's password.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::WeakPassword`] when the provider rejects the
    /// new password and [`IdentityError::RequiresRecentLogin`] when the
    /// session is too old for a sensitive change.
    async fn update_password(&self, new_password: &Password) -> IdentityResult<()>;

    /// Deletes the signed-in user and clears the session.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::NotSignedIn`] without a session.
    async fn delete_user(&self) -> IdentityResult<()>;

    /// Asks the provider to email a verification link to the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::NotSignedIn`] without a session.
    async fn send_verification_email(&self) -> IdentityResult<()>;
}

/// Supplies the bearer token used to authorise document store requests.
pub trait AccessTokenSource: Send + Sync {
    /// Returns the current token, or `None` when nobody is signed in.
    fn access_token(&self) -> Option<String>;
}

/// Errors returned by identity provider implementations.
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    /// The email is unknown or the password does not match.
    #[error("the email or password is incorrect")]
    InvalidCredentials,

    /// The provider rejected a new password.
    #[error("the password is too weak: {0}")]
    WeakPassword(String),

    /// The session is too old for a sensitive operation.
    #[error("please sign in again before making this change")]
    RequiresRecentLogin,

    /// The operation needs a signed-in user.
    #[error("no user is signed in")]
    NotSignedIn,

    /// The user record no longer exists.
    #[error("the user account no longer exists")]
    UserNotFound,

    /// The provider is throttling requests.
    #[error("too many attempts, try again later")]
    TooManyAttempts,

    /// The provider could not be reached.
    #[error("network error: {0}")]
    Network(Arc<dyn std::error::Error + Send + Sync>),

    /// The provider answered with an error this client does not classify.
    #[error("identity provider error {code}: {message}")]
    Provider {
        /// Provider error code.
        code: String,
        /// Provider error message.
        message: String,
    },
}

impl IdentityError {
    /// Wraps a transport failure.
    pub fn network(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Network(Arc::new(err))
    }
}
