//! Adapter implementations for identity ports.

pub mod firebase;
pub mod memory;
