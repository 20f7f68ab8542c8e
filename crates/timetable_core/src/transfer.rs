//! JSON backup export and import.
//!
//! # Responsibility
//! - Render the collection as a pretty-printed backup file.
//! - Parse and validate backup files before they may replace state.
//!
//! # Invariants
//! - Export and storage share one envelope shape (`TimetableData`).
//! - Import is all-or-nothing: any invalid item rejects the whole file.
//! - Imported colors are recomputed from subjects.

use crate::logging::sanitize_message;
use crate::model::entry::Entry;
use crate::model::timetable::{find_duplicate_id, TimetableData};
use chrono::{DateTime, Local, NaiveDate, Utc};
use log::{info, warn};
use serde::Deserialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

const MAX_LOGGED_ERROR_CHARS: usize = 160;

/// Rejection reason for an imported backup.
#[derive(Debug)]
pub enum ImportError {
    /// File content is not JSON.
    InvalidJson(serde_json::Error),
    /// Top-level value lacks an `entries` array.
    MissingEntries,
    /// One item of `entries` is not a valid entry.
    InvalidEntry { index: usize, reason: String },
    /// Two items share an id.
    DuplicateId(String),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidJson(err) => write!(f, "failed to parse file: {err}"),
            Self::MissingEntries => write!(f, "invalid file format: expected an `entries` array"),
            Self::InvalidEntry { index, reason } => {
                write!(f, "invalid file format: entry #{index}: {reason}")
            }
            Self::DuplicateId(id) => write!(f, "invalid file format: duplicate entry id `{id}`"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidJson(err) => Some(err),
            _ => None,
        }
    }
}

/// File-system failure around export/import, or a rejected import.
#[derive(Debug)]
pub enum TransferError {
    Io { path: PathBuf, source: std::io::Error },
    Encode(serde_json::Error),
    Import(ImportError),
}

impl Display for TransferError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Encode(err) => write!(f, "failed to encode timetable: {err}"),
            Self::Import(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
            Self::Import(err) => Some(err),
        }
    }
}

impl From<ImportError> for TransferError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

/// Backup file name for the given local date: `timetable-YYYY-MM-DD.json`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("timetable-{}.json", date.format("%Y-%m-%d"))
}

/// Pretty-printed backup content stamped with `now`.
pub fn render_export(entries: &[Entry], now: DateTime<Utc>) -> serde_json::Result<String> {
    TimetableData::at(entries.to_vec(), now).to_pretty_json()
}

/// Writes a backup of `entries` into `dir`, named after today's local date.
///
/// An existing backup from the same day is overwritten. Returns the written path.
pub fn export_to_file(entries: &[Entry], dir: &Path) -> Result<PathBuf, TransferError> {
    let now = Local::now();
    let path = dir.join(export_file_name(now.date_naive()));
    let content =
        render_export(entries, now.with_timezone(&Utc)).map_err(TransferError::Encode)?;

    fs::create_dir_all(dir).map_err(|source| TransferError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    fs::write(&path, content).map_err(|source| TransferError::Io {
        path: path.clone(),
        source,
    })?;

    info!(
        "event=timetable_export module=transfer status=ok entries={}",
        entries.len()
    );
    Ok(path)
}

/// Parses backup content into entries.
///
/// Accepts any JSON object whose `entries` field is an array of valid entries;
/// other top-level fields (including `lastUpdated`) are ignored.
pub fn import_from_str(contents: &str) -> Result<Vec<Entry>, ImportError> {
    let result = parse_backup(contents);
    match &result {
        Ok(entries) => info!(
            "event=timetable_import module=transfer status=ok entries={}",
            entries.len()
        ),
        Err(err) => warn!(
            "event=timetable_import module=transfer status=rejected error={}",
            sanitize_message(&err.to_string(), MAX_LOGGED_ERROR_CHARS)
        ),
    }
    result
}

/// Reads a backup file from disk and parses it.
pub fn import_from_file(path: &Path) -> Result<Vec<Entry>, TransferError> {
    let contents = fs::read_to_string(path).map_err(|source| TransferError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(import_from_str(&contents)?)
}

fn parse_backup(contents: &str) -> Result<Vec<Entry>, ImportError> {
    let value: Value = serde_json::from_str(contents).map_err(ImportError::InvalidJson)?;
    let items = match value.get("entries") {
        Some(Value::Array(items)) => items,
        _ => return Err(ImportError::MissingEntries),
    };

    let entries = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            Entry::deserialize(item).map_err(|err| ImportError::InvalidEntry {
                index,
                reason: err.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(id) = find_duplicate_id(&entries) {
        return Err(ImportError::DuplicateId(id.to_string()));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::{export_file_name, import_from_str, render_export, ImportError};
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn file_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 7).unwrap();
        assert_eq!(export_file_name(date), "timetable-2026-01-07.json");
    }

    #[test]
    fn export_of_empty_collection_is_pretty_envelope() {
        let now = Utc.with_ymd_and_hms(2026, 1, 7, 12, 0, 0).unwrap();
        let content = render_export(&[], now).unwrap();
        assert_eq!(
            content,
            "{\n  \"entries\": [],\n  \"lastUpdated\": \"2026-01-07T12:00:00.000Z\"\n}"
        );
    }

    #[test]
    fn rejects_non_json() {
        let err = import_from_str("{ not json").unwrap_err();
        assert!(matches!(err, ImportError::InvalidJson(_)));
        assert!(err.to_string().starts_with("failed to parse file"));
    }

    #[test]
    fn rejects_missing_or_non_array_entries() {
        for contents in ["{}", r#"{"entries": "not-an-array"}"#, "[]", "null"] {
            let err = import_from_str(contents).unwrap_err();
            assert!(matches!(err, ImportError::MissingEntries), "{contents}");
        }
    }

    #[test]
    fn rejects_invalid_item_with_index() {
        let contents = r#"{"entries": [
            {"id": "a", "subject": "Math", "hour": 9, "minute": 0, "endHour": 10, "endMinute": 0},
            {"id": "b", "subject": "Art", "hour": 24, "minute": 0, "endHour": 10, "endMinute": 0}
        ]}"#;
        let err = import_from_str(contents).unwrap_err();
        match err {
            ImportError::InvalidEntry { index, reason } => {
                assert_eq!(index, 1);
                assert!(reason.contains("hour (24)"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_duplicate_ids() {
        let contents = r#"{"entries": [
            {"id": "a", "subject": "Math", "hour": 9, "minute": 0, "endHour": 10, "endMinute": 0},
            {"id": "a", "subject": "Art", "hour": 11, "minute": 0, "endHour": 12, "endMinute": 0}
        ]}"#;
        let err = import_from_str(contents).unwrap_err();
        assert!(matches!(err, ImportError::DuplicateId(id) if id == "a"));
    }

    #[test]
    fn recomputes_colors_and_normalizes_homework() {
        let contents = r#"{"entries": [
            {"id": "a", "subject": " Biology ", "hour": 9, "minute": 0,
             "endHour": 10, "endMinute": 0, "homework": "   ", "color": "math"}
        ], "lastUpdated": "2020-01-01T00:00:00.000Z"}"#;
        let entries = import_from_str(contents).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].subject(), "Biology");
        assert_eq!(entries[0].color().as_str(), "science");
        assert_eq!(entries[0].homework(), None);
    }

    #[test]
    fn empty_entries_array_is_valid() {
        assert!(import_from_str(r#"{"entries": []}"#).unwrap().is_empty());
    }
}
