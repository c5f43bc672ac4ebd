//! Error types for account domain validation.

use thiserror::Error;

/// Errors returned while constructing account domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountDomainError {
    /// The user identifier is empty or contains a path separator.
    #[error("invalid user identifier '{0}'")]
    InvalidUserId(String),

    /// The email address is not of the form `local@domain`.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),

    /// A password was required but none was entered.
    #[error("password must not be empty")]
    EmptyPassword,
}
