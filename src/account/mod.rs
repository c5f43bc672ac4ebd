//! Account and session management for Tickbox.
//!
//! This module wraps the hosted identity provider: signing in and out,
//! re-authenticating before sensitive changes, changing the password, sending
//! verification emails, and deleting the account together with every task the
//! user owns. It follows the same hexagonal layout as [`crate::todo`]:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
