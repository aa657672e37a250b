//! Storage module for alchemist
//!
//! Local persistent key-value storage. Containers persist whole JSON
//! snapshots under fixed keys and rehydrate them on startup.

mod database;
mod kv;
mod repository;

pub use database::{Database, StorageStats};
pub use kv::{KeyValueStore, MemoryStorage};
pub use repository::{load_snapshot, save_snapshot, Snapshot};
