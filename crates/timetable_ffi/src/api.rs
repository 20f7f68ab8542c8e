//! FFI use-case API for the Flutter timetable shell.
//!
//! # Responsibility
//! - Expose stable, use-case-level timetable functions to Dart via FRB.
//! - Turn every outcome into a notification-ready envelope.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Each call opens storage, applies one action and releases it; calls are
//!   serialized so concurrent callers never interleave load and save.

use log::warn;
use std::error::Error;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use timetable_core::db::open_db;
use timetable_core::{
    core_version as core_version_inner, format_hour_label, init_logging as init_logging_inner,
    ClockTime, Entry, EntryDraft, EntryValidationError, SqliteBackend, TimetableStore,
    HOURS_PER_DAY,
};

type ActionError = Box<dyn Error>;

const STORAGE_DB_FILE_NAME: &str = "timetable.sqlite3";
const STORAGE_PATH_ENV: &str = "TIMETABLE_DB_PATH";
static STORAGE_PATH: OnceLock<PathBuf> = OnceLock::new();
static STORE_LOCK: Mutex<()> = Mutex::new(());

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// # FFI contract
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory for rolling log files.
/// - Idempotent for the same arguments; returns empty string on success and
///   the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the storage database location for this process.
///
/// Must be called before the first timetable call; later calls are rejected.
/// Returns empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_storage_path(db_path: String) -> String {
    let trimmed = db_path.trim();
    if trimmed.is_empty() {
        return "db_path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = STORAGE_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "storage already configured at `{}`; refusing to switch",
            active.display()
        )
    }
}

/// Entry projection rendered on a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView {
    pub id: String,
    pub subject: String,
    pub hour: u8,
    pub minute: u8,
    pub end_hour: u8,
    pub end_minute: u8,
    /// `9:00 AM - 10:00 AM`.
    pub time_range: String,
    pub homework: Option<String>,
    /// `math|english|science|history|default`.
    pub color: String,
}

/// One row of the 24-hour grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourRowView {
    pub hour: u8,
    /// `9 AM`.
    pub label: String,
    pub entries: Vec<EntryView>,
}

/// Generic action response envelope; `message` is shown as a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableActionResponse {
    pub ok: bool,
    pub entry_id: Option<String>,
    pub message: String,
}

impl TimetableActionResponse {
    fn success(message: impl Into<String>, entry_id: Option<String>) -> Self {
        Self {
            ok: true,
            entry_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            entry_id: None,
            message: message.into(),
        }
    }
}

/// Form input for add/edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInput {
    pub subject: String,
    pub hour: u8,
    pub minute: u8,
    pub end_hour: u8,
    pub end_minute: u8,
    pub homework: Option<String>,
}

/// Adds an entry.
#[flutter_rust_bridge::frb(sync)]
pub fn timetable_add(input: EntryInput) -> TimetableActionResponse {
    let outcome = with_store(|store| {
        let entry = store.add(to_draft(&input)?)?;
        Ok(entry.id().to_string())
    });
    match outcome {
        Ok(id) => TimetableActionResponse::success("Entry added", Some(id)),
        Err(err) => TimetableActionResponse::failure(format!("timetable_add failed: {err}")),
    }
}

/// Replaces the entry with `id`; its color is recomputed from the subject.
#[flutter_rust_bridge::frb(sync)]
pub fn timetable_edit(id: String, input: EntryInput) -> TimetableActionResponse {
    let outcome = with_store(|store| {
        let entry = store.edit(id.as_str(), to_draft(&input)?)?;
        Ok(entry.id().to_string())
    });
    match outcome {
        Ok(id) => TimetableActionResponse::success("Entry updated", Some(id)),
        Err(err) => TimetableActionResponse::failure(format!("timetable_edit failed: {err}")),
    }
}

/// Deletes the entry with `id`.
#[flutter_rust_bridge::frb(sync)]
pub fn timetable_delete(id: String) -> TimetableActionResponse {
    match with_store(|store| Ok(store.delete(id.as_str())?.id().to_string())) {
        Ok(id) => TimetableActionResponse::success("Entry deleted", Some(id)),
        Err(err) => TimetableActionResponse::failure(format!("timetable_delete failed: {err}")),
    }
}

/// Removes every entry.
#[flutter_rust_bridge::frb(sync)]
pub fn timetable_clear() -> TimetableActionResponse {
    match with_store(|store| Ok(store.clear_all()?)) {
        Ok(_) => TimetableActionResponse::success("All entries cleared", None),
        Err(err) => TimetableActionResponse::failure(format!("timetable_clear failed: {err}")),
    }
}

/// Entries starting in `hour`, in insertion order. Empty on storage failure.
#[flutter_rust_bridge::frb(sync)]
pub fn timetable_entries_for_hour(hour: u8) -> Vec<EntryView> {
    with_store(|store| {
        Ok(store
            .entries_for_hour(hour)
            .into_iter()
            .map(to_entry_view)
            .collect())
    })
    .unwrap_or_else(|err| {
        warn!("event=ffi_query module=ffi status=error query=entries_for_hour error={err}");
        Vec::new()
    })
}

/// All 24 grid rows. Empty on storage failure.
#[flutter_rust_bridge::frb(sync)]
pub fn timetable_grid() -> Vec<HourRowView> {
    with_store(|store| {
        Ok((0..HOURS_PER_DAY)
            .map(|hour| HourRowView {
                hour,
                label: format_hour_label(hour),
                entries: store
                    .entries_for_hour(hour)
                    .into_iter()
                    .map(to_entry_view)
                    .collect(),
            })
            .collect())
    })
    .unwrap_or_else(|err| {
        warn!("event=ffi_query module=ffi status=error query=grid error={err}");
        Vec::new()
    })
}

/// Writes a dated JSON backup into `dir`; the message carries the file path.
#[flutter_rust_bridge::frb(sync)]
pub fn timetable_export(dir: String) -> TimetableActionResponse {
    let outcome = with_store(|store| {
        Ok(store.export_to_dir(&PathBuf::from(dir.trim()))?)
    });
    match outcome {
        Ok(path) => TimetableActionResponse::success(path.display().to_string(), None),
        Err(err) => TimetableActionResponse::failure(format!("timetable_export failed: {err}")),
    }
}

/// Replaces the timetable with the content of a picked backup file.
///
/// On rejection the current timetable is left unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn timetable_import(contents: String) -> TimetableActionResponse {
    match with_store(|store| Ok(store.import_json(&contents)?)) {
        Ok(count) => {
            TimetableActionResponse::success(format!("Timetable imported ({count} entries)"), None)
        }
        Err(err) => TimetableActionResponse::failure(format!("timetable_import failed: {err}")),
    }
}

fn to_draft(input: &EntryInput) -> Result<EntryDraft, EntryValidationError> {
    let start = ClockTime::new(input.hour, input.minute)?;
    let end = ClockTime::new(input.end_hour, input.end_minute)?;
    let mut draft = EntryDraft::new(input.subject.clone(), start, end);
    draft.homework = input.homework.clone();
    Ok(draft)
}

fn to_entry_view(entry: &Entry) -> EntryView {
    EntryView {
        id: entry.id().to_string(),
        subject: entry.subject().to_string(),
        hour: entry.start().hour(),
        minute: entry.start().minute(),
        end_hour: entry.end().hour(),
        end_minute: entry.end().minute(),
        time_range: entry.time_range_label(),
        homework: entry.homework().map(str::to_string),
        color: entry.color().as_str().to_string(),
    }
}

fn resolve_storage_path() -> PathBuf {
    STORAGE_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(STORAGE_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STORAGE_DB_FILE_NAME)
        })
        .clone()
}

fn with_store<T>(
    f: impl FnOnce(&mut TimetableStore<SqliteBackend<'_>>) -> Result<T, ActionError>,
) -> Result<T, String> {
    let _guard = STORE_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let conn = open_db(resolve_storage_path()).map_err(|err| format!("storage open failed: {err}"))?;
    let backend =
        SqliteBackend::try_new(&conn).map_err(|err| format!("storage init failed: {err}"))?;
    let mut store = TimetableStore::open(backend);
    f(&mut store).map_err(|err| err.to_string())
}
