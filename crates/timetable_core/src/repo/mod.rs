//! Persistence layer for the timetable collection.
//!
//! # Responsibility
//! - Define the storage-slot capability (`PersistenceBackend`).
//! - Provide SQLite and in-memory slot implementations.
//! - Encode/decode the full collection to/from one slot.
//!
//! # Invariants
//! - The whole collection is written as one value; no partial writes.
//! - Read failures degrade to an empty collection and never reach callers.

pub mod backend;
pub mod persistence;
pub mod sqlite_backend;
