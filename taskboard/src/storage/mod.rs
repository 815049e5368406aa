//! Storage module
//!
//! Provides the durable key-value slots and the state persistence adapter.

pub mod kv;
pub mod persistence;

pub use kv::{FileStorage, KeyValueStorage, MemoryStorage};
pub use persistence::StatePersistence;
