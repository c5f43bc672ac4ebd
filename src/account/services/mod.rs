//! Application services for sessions and account lifecycle.

mod deletion;
mod session;

pub use deletion::{AccountDeletionError, AccountDeletionService, DeletionReport};
pub use session::{SessionError, SessionResult, SessionService};
