//! Whole-collection load/save over a storage slot.
//!
//! # Invariants
//! - `load_entries` never fails: missing, unreadable or malformed slot data
//!   yields an empty collection.
//! - `save_entries` always writes a fresh `lastUpdated`.

use crate::logging::sanitize_message;
use crate::model::entry::Entry;
use crate::model::timetable::{find_duplicate_id, TimetableData};
use crate::repo::backend::{PersistenceBackend, StorageResult};
use log::{debug, info, warn};

const MAX_LOGGED_ERROR_CHARS: usize = 160;

/// Reads the stored collection, treating every failure as "first run".
pub fn load_entries(backend: &impl PersistenceBackend) -> Vec<Entry> {
    let payload = match backend.load() {
        Ok(Some(payload)) => payload,
        Ok(None) => {
            debug!("event=timetable_load module=repo status=empty reason=missing_slot");
            return Vec::new();
        }
        Err(err) => {
            warn!(
                "event=timetable_load module=repo status=fallback error_code=storage_read_failed error={}",
                sanitize_message(&err.to_string(), MAX_LOGGED_ERROR_CHARS)
            );
            return Vec::new();
        }
    };

    match decode_entries(&payload) {
        Ok(entries) => {
            info!(
                "event=timetable_load module=repo status=ok entries={}",
                entries.len()
            );
            entries
        }
        Err(reason) => {
            warn!(
                "event=timetable_load module=repo status=fallback error_code=storage_malformed error={}",
                sanitize_message(&reason, MAX_LOGGED_ERROR_CHARS)
            );
            Vec::new()
        }
    }
}

/// Serializes the full collection with a fresh timestamp and overwrites the slot.
///
/// Returns the envelope that was written.
pub fn save_entries(
    backend: &impl PersistenceBackend,
    entries: &[Entry],
) -> StorageResult<TimetableData> {
    let data = TimetableData::new(entries.to_vec());
    let payload = data.to_json()?;

    match backend.save(&payload) {
        Ok(()) => {
            info!(
                "event=timetable_save module=repo status=ok entries={} bytes={}",
                entries.len(),
                payload.len()
            );
            Ok(data)
        }
        Err(err) => {
            warn!(
                "event=timetable_save module=repo status=error error_code=storage_write_failed error={}",
                sanitize_message(&err.to_string(), MAX_LOGGED_ERROR_CHARS)
            );
            Err(err)
        }
    }
}

fn decode_entries(payload: &str) -> Result<Vec<Entry>, String> {
    let data = TimetableData::from_json(payload).map_err(|err| err.to_string())?;
    if let Some(id) = find_duplicate_id(&data.entries) {
        return Err(format!("duplicate entry id `{id}`"));
    }
    Ok(data.entries)
}

#[cfg(test)]
mod tests {
    use super::{load_entries, save_entries};
    use crate::model::clock::ClockTime;
    use crate::model::entry::{Entry, EntryDraft};
    use crate::repo::backend::{MemoryBackend, StorageError};

    fn sample() -> Vec<Entry> {
        let nine = ClockTime::at_hour(9).unwrap();
        let ten = ClockTime::new(10, 45).unwrap();
        vec![
            Entry::new(EntryDraft::new("Math", nine, nine.default_end()).with_homework("p. 12"))
                .unwrap(),
            Entry::new(EntryDraft::new("Lunch", ten, ten.default_end())).unwrap(),
        ]
    }

    #[test]
    fn missing_slot_loads_empty() {
        assert!(load_entries(&MemoryBackend::new()).is_empty());
    }

    #[test]
    fn corrupted_slot_loads_empty() {
        for payload in [
            "not json",
            "{}",
            r#"{"entries": "nope"}"#,
            r#"{"entries": [{"id": "x"}]}"#,
        ] {
            let backend = MemoryBackend::with_payload(payload);
            assert!(load_entries(&backend).is_empty(), "{payload}");
        }
    }

    #[test]
    fn duplicate_ids_in_slot_load_empty() {
        let payload = r#"{"entries": [
            {"id": "a", "subject": "Math", "hour": 9, "minute": 0, "endHour": 10, "endMinute": 0},
            {"id": "a", "subject": "Art", "hour": 11, "minute": 0, "endHour": 12, "endMinute": 0}
        ], "lastUpdated": ""}"#;
        assert!(load_entries(&MemoryBackend::with_payload(payload)).is_empty());
    }

    #[test]
    fn read_failure_loads_empty() {
        let backend = MemoryBackend::with_payload(r#"{"entries": []}"#);
        backend.set_fail_reads(true);
        assert!(load_entries(&backend).is_empty());
    }

    #[test]
    fn save_then_load_roundtrips() {
        let backend = MemoryBackend::new();
        let entries = sample();

        let written = save_entries(&backend, &entries).unwrap();
        assert!(!written.last_updated.is_empty());
        assert_eq!(load_entries(&backend), entries);
    }

    #[test]
    fn write_failure_is_returned() {
        let backend = MemoryBackend::new();
        backend.set_fail_writes(true);
        let err = save_entries(&backend, &sample()).unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));
        assert_eq!(backend.payload(), None);
    }
}
