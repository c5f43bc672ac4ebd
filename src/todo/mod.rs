//! Personal task records for Tickbox.
//!
//! Tasks are documents in the hosted store, each owned by exactly one user.
//! Every store call is scoped by the acting user; adapters refuse to touch a
//! task owned by someone else. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
