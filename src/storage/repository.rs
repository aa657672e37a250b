//! Persisted snapshots on top of a key-value store
//!
//! A container's persisted fields are written as one JSON envelope under a
//! fixed key and read back whole.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::storage::KeyValueStore;

/// Envelope written for every persisted container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot<T> {
    pub state: T,
    #[serde(default)]
    pub version: u32,
}

/// Read and decode the snapshot stored under `key`
pub fn load_snapshot<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    let snapshot: Snapshot<T> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to decode persisted state under '{}'", key))?;

    Ok(Some(snapshot.state))
}

/// Encode `state` and overwrite whatever was stored under `key`
pub fn save_snapshot<T: Serialize>(store: &dyn KeyValueStore, key: &str, state: &T) -> Result<()> {
    let snapshot = Snapshot { state, version: 0 };
    let raw = serde_json::to_string(&snapshot)?;
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Counter {
        count: u32,
    }

    #[test]
    fn missing_key_loads_none() {
        let storage = MemoryStorage::new();
        let loaded: Option<Counter> = load_snapshot(&storage, "absent").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn snapshot_is_wrapped_in_envelope() {
        let storage = MemoryStorage::new();
        save_snapshot(&storage, "counter", &Counter { count: 3 }).unwrap();

        let raw = storage.get("counter").unwrap().unwrap();
        assert_eq!(raw, r#"{"state":{"count":3},"version":0}"#);

        let loaded: Option<Counter> = load_snapshot(&storage, "counter").unwrap();
        assert_eq!(loaded, Some(Counter { count: 3 }));
    }

    #[test]
    fn corrupt_value_is_an_error() {
        let storage = MemoryStorage::new();
        storage.set("counter", "not json").unwrap();

        let err = load_snapshot::<Counter>(&storage, "counter").unwrap_err();
        assert!(err.to_string().contains("counter"));
    }
}
