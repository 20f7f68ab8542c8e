//! SQLite implementation of the timetable storage slot.
//!
//! # Invariants
//! - Slot rows live in `kv_store`, keyed by slot name.
//! - The default slot name never changes between releases.

use crate::repo::backend::{PersistenceBackend, StorageError, StorageResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Slot name for the timetable collection. Must stay stable so existing user
/// data is found after upgrades.
pub const DEFAULT_STORAGE_KEY: &str = "digital-organizer-timetable";

/// Storage slot backed by one `kv_store` row.
pub struct SqliteBackend<'conn> {
    conn: &'conn Connection,
    key: String,
}

impl<'conn> SqliteBackend<'conn> {
    /// Binds the default timetable slot on a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        Self::try_with_key(conn, DEFAULT_STORAGE_KEY)
    }

    /// Binds an explicit slot name.
    ///
    /// # Errors
    /// - `Unavailable` when the connection has not been migrated.
    pub fn try_with_key(conn: &'conn Connection, key: impl Into<String>) -> StorageResult<Self> {
        let has_table: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv_store'
            );",
            [],
            |row| row.get(0),
        )?;
        if has_table == 0 {
            return Err(StorageError::Unavailable(
                "kv_store table is missing; open the database with db::open_db".to_string(),
            ));
        }

        Ok(Self {
            conn,
            key: key.into(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PersistenceBackend for SqliteBackend<'_> {
    fn load(&self) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [self.key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save(&self, payload: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![self.key.as_str(), payload],
        )?;
        Ok(())
    }
}
