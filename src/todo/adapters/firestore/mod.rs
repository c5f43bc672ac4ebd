//! Firestore REST adapter for task documents.
//!
//! Tasks live in one collection with the fields `text`, `completed`, `userId`
//! and `createdAt`. Requests carry the signed-in user's bearer token from an
//! [`AccessTokenSource`](crate::account::ports::AccessTokenSource).

mod models;
mod store;

pub use store::{FirestoreTodoStore, MAX_BATCH_WRITES};
