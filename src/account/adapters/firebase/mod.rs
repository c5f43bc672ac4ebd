//! Identity Toolkit REST adapter for the hosted identity provider.
//!
//! Speaks the `accounts:*` endpoints of the Firebase Authentication REST API.
//! The session, including the bearer token, is held in a [`SessionHandle`]
//! that the document store adapter shares for authorisation.

mod models;
mod provider;
mod session;

pub use provider::FirebaseIdentityProvider;
pub use session::SessionHandle;
