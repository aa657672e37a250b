//! Key-value storage abstraction

use anyhow::{anyhow, Result};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Whole-value storage addressed by string keys.
///
/// Values are opaque strings; callers decide the encoding. Writes replace
/// the previous value entirely.
pub trait KeyValueStore: Send {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key` if present
    fn remove(&self, key: &str) -> Result<()>;

    /// List all stored keys in ascending order
    fn keys(&self) -> Result<Vec<String>>;
}

/// In-process storage. Clones share the same underlying map, so a second
/// container built from a clone sees what the first one wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow!("memory storage lock poisoned"))
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries() {
        let storage = MemoryStorage::new();
        let other = storage.clone();

        storage.set("a", "1").unwrap();
        assert_eq!(other.get("a").unwrap().as_deref(), Some("1"));

        other.remove("a").unwrap();
        assert!(storage.get("a").unwrap().is_none());
    }

    #[test]
    fn set_overwrites_whole_value() {
        let storage = MemoryStorage::new();
        storage.set("k", "first").unwrap();
        storage.set("k", "second").unwrap();

        assert_eq!(storage.get("k").unwrap().as_deref(), Some("second"));
        assert_eq!(storage.keys().unwrap(), vec!["k".to_string()]);
    }
}
