//! Shared session cell.

use crate::account::{domain::AuthSession, ports::AccessTokenSource};
use std::sync::{Arc, PoisonError, RwLock};

/// Cloneable handle on the signed-in session.
///
/// The identity adapter writes it; the document store reads the bearer token
/// from it through [`AccessTokenSource`].
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<RwLock<Option<AuthSession>>>,
}

impl SessionHandle {
    /// Creates an empty handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the current session.
    #[must_use]
    pub fn get(&self) -> Option<AuthSession> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the current session.
    ///
    /// A poisoned lock is recovered so signing out always drops the token.
    pub fn set(&self, session: Option<AuthSession>) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = session;
    }

    /// Applies `update` to the session when one exists.
    pub fn update(&self, update: impl FnOnce(&mut AuthSession)) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(session) = guard.as_mut() {
            update(session);
        }
    }
}

impl AccessTokenSource for SessionHandle {
    fn access_token(&self) -> Option<String> {
        self.get().map(|session| session.id_token().to_owned())
    }
}
