//! Domain model for tasks.

mod error;
mod ids;
mod todo;

pub use error::TodoDomainError;
pub use ids::{TodoId, TodoText};
pub use todo::{NewTodo, PersistedTodoData, Todo, TodoPatch};
