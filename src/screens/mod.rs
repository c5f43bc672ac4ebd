//! Headless screen view-models.
//!
//! Each screen owns its UI state exclusively and reaches the hosted services
//! only through injected account and task services. A UI shell renders the
//! state these types expose and forwards user events to their methods. Every
//! remote call runs under the screen's [`ScreenLifetime`], so a torn-down
//! screen never applies a late result.

mod add_todo;
mod error;
mod lifetime;
mod manage_account;
mod todo_list;

pub use add_todo::AddTodoModal;
pub use error::{ScreenError, ScreenResult};
pub use lifetime::ScreenLifetime;
pub use manage_account::{ManageAccountScreen, Navigation};
pub use todo_list::{BackPressOutcome, LoadState, RowMode, TodoListScreen, TodoRow};
