//! Password handling.

use super::AccountDomainError;
use std::fmt;

/// A non-empty password as typed by the user.
///
/// Strength rules belong to the identity provider, so only emptiness is
/// checked here. The value never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Creates a password from user input.
    ///
    /// # Errors
    ///
    /// Returns [`AccountDomainError::EmptyPassword`] when the input is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, AccountDomainError> {
        let raw = value.into();
        if raw.is_empty() {
            return Err(AccountDomainError::EmptyPassword);
        }
        Ok(Self(raw))
    }

    /// Exposes the secret for transmission to the identity provider.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns the password length in characters.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}
