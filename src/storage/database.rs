//! SQLite-backed key-value storage

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::config::Settings;
use crate::storage::KeyValueStore;

/// Database wrapper for alchemist
pub struct Database {
    conn: Connection,
}

const CURRENT_SCHEMA_VERSION: i64 = 1;

impl Database {
    /// Open or create the database
    pub fn open(settings: &Settings) -> Result<Self> {
        let db_path = settings.database_path();

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        Self::open_path(&db_path)
    }

    /// Open database at a specific path (useful for testing)
    pub fn open_path(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize database schema
    fn initialize(&self) -> Result<()> {
        let current_version = self.schema_version()?;
        if current_version > CURRENT_SCHEMA_VERSION {
            anyhow::bail!(
                "Database schema version {} is newer than supported version {}",
                current_version,
                CURRENT_SCHEMA_VERSION
            );
        }

        if current_version < 1 {
            self.migrate_to_v1()?;
            self.set_schema_version(1)?;
        }

        Ok(())
    }

    /// Current schema version tracked in PRAGMA user_version.
    pub fn schema_version(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))?)
    }

    fn set_schema_version(&self, version: i64) -> Result<()> {
        self.conn
            .execute(&format!("PRAGMA user_version = {}", version), [])?;
        Ok(())
    }

    fn migrate_to_v1(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;

        Ok(())
    }

    /// Get database statistics
    pub fn get_stats(&self) -> Result<StorageStats> {
        let (total_keys, total_bytes): (i64, Option<i64>) = self.conn.query_row(
            "SELECT COUNT(*), SUM(LENGTH(value)) FROM kv_store",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(StorageStats {
            total_keys: total_keys as usize,
            total_bytes: total_bytes.unwrap_or(0) as u64,
        })
    }
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value, Utc::now().timestamp()],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv_store ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(keys)
    }
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct StorageStats {
    pub total_keys: usize,
    pub total_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_create_database() {
        let db = Database::open_memory().unwrap();
        let stats = db.get_stats().unwrap();
        assert_eq!(stats.total_keys, 0);
        assert_eq!(stats.total_bytes, 0);
    }

    #[test]
    fn test_set_get_and_overwrite() {
        let db = Database::open_memory().unwrap();

        db.set("interview-storage", "{\"a\":1}").unwrap();
        db.set("interview-storage", "{\"a\":2}").unwrap();

        assert_eq!(
            db.get("interview-storage").unwrap().as_deref(),
            Some("{\"a\":2}")
        );
        assert_eq!(db.get_stats().unwrap().total_keys, 1);
    }

    #[test]
    fn test_remove_and_missing_key() {
        let db = Database::open_memory().unwrap();
        db.set("k", "v").unwrap();
        db.remove("k").unwrap();

        assert!(db.get("k").unwrap().is_none());
        assert!(db.keys().unwrap().is_empty());
    }

    #[test]
    fn test_new_database_sets_schema_version() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.schema_version().unwrap(), 1);
    }

    #[test]
    fn test_values_survive_reopen() {
        let tmp = tempdir().unwrap();
        let db_path = tmp.path().join("alchemist.db");

        {
            let db = Database::open_path(&db_path).unwrap();
            db.set("settings-storage", "{}").unwrap();
        }

        let db = Database::open_path(&db_path).unwrap();
        assert_eq!(db.schema_version().unwrap(), 1);
        assert_eq!(db.get("settings-storage").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_newer_schema_is_rejected() {
        let tmp = tempdir().unwrap();
        let db_path = tmp.path().join("future.db");

        let conn = Connection::open(&db_path).unwrap();
        conn.execute_batch("PRAGMA user_version = 7;").unwrap();
        drop(conn);

        let err = match Database::open_path(&db_path) {
            Ok(_) => panic!("expected newer schema to be rejected"),
            Err(e) => e.to_string(),
        };
        assert!(err.contains("newer than supported"));
    }
}
