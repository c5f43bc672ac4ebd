//! Port contracts for task storage.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod store;

pub use store::{TodoStore, TodoStoreError, TodoStoreResult};

#[cfg(test)]
pub use store::MockTodoStore;
