//! Signed-in user and session types.

use super::{EmailAddress, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity record attributes consumed by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    email_verified: bool,
}

impl User {
    /// Creates a user record.
    #[must_use]
    pub const fn new(id: UserId, email: EmailAddress, email_verified: bool) -> Self {
        Self {
            id,
            email,
            email_verified,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Returns the sign-in email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns `true` once the user has confirmed their email address.
    #[must_use]
    pub const fn email_verified(&self) -> bool {
        self.email_verified
    }

    /// Returns a copy of this user with the verification flag replaced.
    #[must_use]
    pub fn with_email_verified(self, email_verified: bool) -> Self {
        Self {
            email_verified,
            ..self
        }
    }
}

/// Authenticated session issued by the identity provider.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthSession {
    user: User,
    id_token: String,
    refresh_token: Option<String>,
}

impl AuthSession {
    /// Creates a session for `user` authorised by `id_token`.
    #[must_use]
    pub const fn new(user: User, id_token: String, refresh_token: Option<String>) -> Self {
        Self {
            user,
            id_token,
            refresh_token,
        }
    }

    /// Returns the signed-in user.
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    /// Returns the bearer token presented to the document store.
    #[must_use]
    pub fn id_token(&self) -> &str {
        &self.id_token
    }

    /// Returns the refresh token, if the provider issued one.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Replaces the user record, keeping the tokens.
    pub fn set_user(&mut self, user: User) {
        self.user = user;
    }

    /// Replaces the tokens after the provider re-issues them.
    pub fn set_tokens(&mut self, id_token: String, refresh_token: Option<String>) {
        self.id_token = id_token;
        if refresh_token.is_some() {
            self.refresh_token = refresh_token;
        }
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("user", &self.user)
            .field("id_token", &"***")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "***"))
            .finish()
    }
}
