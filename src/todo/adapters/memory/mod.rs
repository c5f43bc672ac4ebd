//! In-memory task store adapter.

mod store;

pub use store::InMemoryTodoStore;
