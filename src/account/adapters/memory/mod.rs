//! In-memory identity adapter.

mod identity;

pub use identity::InMemoryIdentityProvider;
