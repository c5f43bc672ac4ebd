//! Domain model for user identity.
//!
//! Users are owned by the external identity provider; this module only holds
//! the validated values the client passes to it and the attributes it reads
//! back.

mod credentials;
mod error;
mod ids;
mod user;

pub use credentials::Password;
pub use error::AccountDomainError;
pub use ids::{EmailAddress, UserId};
pub use user::{AuthSession, User};
