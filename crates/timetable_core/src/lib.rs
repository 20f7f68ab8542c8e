//! Core domain logic for the daily timetable.
//! This crate is the single source of truth for entry invariants and the
//! persisted/exported JSON shape.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod transfer;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::clock::{
    format_clock_time, format_hour_label, format_time_range, parse_clock_input, ClockTime,
};
pub use model::entry::{Entry, EntryDraft, EntryId, EntryValidationError};
pub use model::subject::{classify_subject, EntryColor};
pub use model::timetable::TimetableData;
pub use repo::backend::{MemoryBackend, PersistenceBackend, StorageError, StorageResult};
pub use repo::persistence::{load_entries, save_entries};
pub use repo::sqlite_backend::{SqliteBackend, DEFAULT_STORAGE_KEY};
pub use service::timetable_store::{StoreError, StoreResult, TimetableStats, TimetableStore};
pub use transfer::{
    export_file_name, export_to_file, import_from_file, import_from_str, render_export,
    ImportError, TransferError,
};

/// Number of hour rows in the daily grid.
pub const HOURS_PER_DAY: u8 = 24;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
