//! Tickbox: a personal to-do list client core.
//!
//! Users sign in against a hosted identity provider, keep their own tasks in a
//! hosted document store, and manage their account. The crate is headless:
//! screens are view-models that a UI shell renders and drives, and all durable
//! state lives in the external services.
//!
//! # Architecture
//!
//! Tickbox follows hexagonal architecture principles:
//!
//! - **Domain**: Validated value types with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for the hosted services
//! - **Adapters**: In-memory doubles and REST clients implementing the ports
//!
//! # Modules
//!
//! - [`account`]: Sign-in, re-authentication, password change and deletion
//! - [`todo`]: Owner-scoped task records
//! - [`screens`]: Task list, add-task modal and account management screens
//! - [`config`]: Backend and logging configuration
//! - [`telemetry`]: Log subscriber installation

pub mod account;
pub mod config;
pub mod screens;
pub mod telemetry;
pub mod todo;
