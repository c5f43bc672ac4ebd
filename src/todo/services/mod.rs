//! Application services for owner-scoped task operations.

mod todos;

pub use todos::{TodoService, TodoServiceError, TodoServiceResult};
