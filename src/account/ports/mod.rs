//! Port contracts for identity management.
//!
//! Ports define infrastructure-agnostic interfaces used by account services.

pub mod identity;

pub use identity::{AccessTokenSource, IdentityError, IdentityProvider, IdentityResult};

#[cfg(test)]
pub use identity::MockIdentityProvider;
