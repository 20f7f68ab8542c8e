//! Storage slot capability and in-memory implementation.
//!
//! # Invariants
//! - A backend owns exactly one named slot; `save` overwrites it entirely.
//! - `load` returns `Ok(None)` when the slot has never been written.

use crate::db::DbError;
use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure while reading or writing the storage slot.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    Encode(serde_json::Error),
    /// Backend reachable but refused the operation.
    Unavailable(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode timetable: {err}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Durable key-value slot holding the serialized timetable.
pub trait PersistenceBackend {
    /// Reads the raw slot content.
    fn load(&self) -> StorageResult<Option<String>>;
    /// Unconditionally replaces the slot content.
    fn save(&self, payload: &str) -> StorageResult<()>;
}

impl<B: PersistenceBackend + ?Sized> PersistenceBackend for &B {
    fn load(&self) -> StorageResult<Option<String>> {
        (**self).load()
    }

    fn save(&self, payload: &str) -> StorageResult<()> {
        (**self).save(payload)
    }
}

/// Process-local slot used as a storage test double.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    payload: RefCell<Option<String>>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with pre-existing slot content, e.g. a corrupted payload.
    pub fn with_payload(payload: impl Into<String>) -> Self {
        let backend = Self::default();
        backend.payload.replace(Some(payload.into()));
        backend
    }

    /// Current raw slot content.
    pub fn payload(&self) -> Option<String> {
        self.payload.borrow().clone()
    }

    /// Number of successful `save` calls.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl PersistenceBackend for MemoryBackend {
    fn load(&self) -> StorageResult<Option<String>> {
        if self.fail_reads.get() {
            return Err(StorageError::Unavailable("read rejected".to_string()));
        }
        Ok(self.payload())
    }

    fn save(&self, payload: &str) -> StorageResult<()> {
        if self.fail_writes.get() {
            return Err(StorageError::Unavailable("write rejected".to_string()));
        }
        self.payload.replace(Some(payload.to_string()));
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
