//! Identifier and validated scalar types for the task domain.

use super::TodoDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned task identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// Creates a validated identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TodoDomainError::InvalidId`] when the value is blank or
    /// contains `/`.
    pub fn new(value: impl Into<String>) -> Result<Self, TodoDomainError> {
        let raw = value.into();
        if raw.trim().is_empty() || raw.contains('/') {
            return Err(TodoDomainError::InvalidId(raw));
        }
        Ok(Self(raw))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TodoId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task text. New input is trimmed and must not be empty; stored text is
/// kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoText(String);

impl TodoText {
    /// Creates validated task text.
    ///
    /// # Errors
    ///
    /// Returns [`TodoDomainError::EmptyText`] when nothing but whitespace is
    /// given.
    pub fn new(value: impl AsRef<str>) -> Result<Self, TodoDomainError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TodoDomainError::EmptyText);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Wraps text read back from storage exactly as stored.
    ///
    /// Older clients saved edits without validation, so stored text may be
    /// blank. Only user input goes through [`Self::new`].
    #[must_use]
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the text as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TodoText {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TodoText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
