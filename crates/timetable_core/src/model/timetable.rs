//! Persisted/exported envelope and collection-level helpers.
//!
//! # Invariants
//! - `entries` keeps insertion order; it is never sorted by time.
//! - `last_updated` is an RFC 3339 UTC timestamp with millisecond precision.

use crate::model::entry::Entry;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Envelope written to local storage and to backup files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableData {
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub last_updated: String,
}

impl TimetableData {
    /// Wraps entries with the current time as `last_updated`.
    pub fn new(entries: Vec<Entry>) -> Self {
        Self::at(entries, Utc::now())
    }

    /// Wraps entries with an explicit `last_updated` moment.
    pub fn at(entries: Vec<Entry>, updated_at: DateTime<Utc>) -> Self {
        Self {
            entries,
            last_updated: format_timestamp(updated_at),
        }
    }

    /// Compact JSON used for the storage slot.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Two-space indented JSON used for backup files.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parses an envelope, validating every entry.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// Formats a timestamp the way `lastUpdated` is written, e.g.
/// `2026-03-01T08:15:00.000Z`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Returns the first id that occurs more than once, if any.
pub fn find_duplicate_id(entries: &[Entry]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(entries.len());
    entries
        .iter()
        .map(Entry::id)
        .find(|id| !seen.insert(*id))
}

/// Entries whose start hour equals `hour`, in original relative order.
pub fn entries_for_hour(entries: &[Entry], hour: u8) -> Vec<&Entry> {
    entries.iter().filter(|entry| entry.hour() == hour).collect()
}
