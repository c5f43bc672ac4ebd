//! Adapter implementations for task store ports.

pub mod firestore;
pub mod memory;
