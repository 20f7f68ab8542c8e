//! Timetable store: the single owner of today's entry collection.
//!
//! # Responsibility
//! - Apply create/edit/delete/replace/clear/import mutations.
//! - Persist the whole collection after every successful mutation.
//! - Answer view queries (hour buckets, summary counts).
//!
//! # Invariants
//! - Entry ids are unique within the collection.
//! - A mutation is committed in memory only after its storage write succeeds;
//!   failed validation, import or write leaves the collection untouched.
//! - Overlapping entries and end-before-start entries are allowed.

use crate::model::entry::{Entry, EntryDraft, EntryId, EntryValidationError};
use crate::model::subject::EntryColor;
use crate::model::timetable::{self, find_duplicate_id};
use crate::repo::backend::{PersistenceBackend, StorageError};
use crate::repo::persistence::{load_entries, save_entries};
use crate::transfer::{self, ImportError, TransferError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level failure surfaced to the front end as a notification.
#[derive(Debug)]
pub enum StoreError {
    Validation(EntryValidationError),
    NotFound(EntryId),
    DuplicateId(EntryId),
    Import(ImportError),
    Storage(StorageError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "entry not found: {id}"),
            Self::DuplicateId(id) => write!(f, "duplicate entry id: {id}"),
            Self::Import(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "failed to save timetable: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Import(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::NotFound(_) | Self::DuplicateId(_) => None,
        }
    }
}

impl From<EntryValidationError> for StoreError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ImportError> for StoreError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Summary counts shown above the grid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimetableStats {
    pub total: usize,
    pub with_homework: usize,
    /// Count per category, in `EntryColor::ALL` order.
    pub per_color: Vec<(EntryColor, usize)>,
}

impl TimetableStats {
    pub fn count(&self, color: EntryColor) -> usize {
        self.per_color
            .iter()
            .find(|(candidate, _)| *candidate == color)
            .map_or(0, |(_, count)| *count)
    }
}

/// In-memory timetable bound to one persistence backend.
pub struct TimetableStore<B: PersistenceBackend> {
    backend: B,
    entries: Vec<Entry>,
}

impl<B: PersistenceBackend> TimetableStore<B> {
    /// Loads the stored collection; unreadable storage starts empty.
    pub fn open(backend: B) -> Self {
        let entries = load_entries(&backend);
        Self { backend, entries }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    /// Entries starting in `hour`, regardless of minute offset or duration.
    pub fn entries_for_hour(&self, hour: u8) -> Vec<&Entry> {
        timetable::entries_for_hour(&self.entries, hour)
    }

    pub fn stats(&self) -> TimetableStats {
        let per_color = EntryColor::ALL
            .iter()
            .map(|color| {
                let count = self
                    .entries
                    .iter()
                    .filter(|entry| entry.color() == *color)
                    .count();
                (*color, count)
            })
            .collect();

        TimetableStats {
            total: self.entries.len(),
            with_homework: self
                .entries
                .iter()
                .filter(|entry| entry.homework().is_some())
                .count(),
            per_color,
        }
    }

    /// Creates an entry with a fresh id and appends it.
    pub fn add(&mut self, draft: EntryDraft) -> StoreResult<Entry> {
        let entry = Entry::new(draft)?;
        let mut next = self.entries.clone();
        next.push(entry.clone());
        self.commit(next, "add")?;
        Ok(entry)
    }

    /// Replaces the entry with `id` in place; color is recomputed.
    pub fn edit(&mut self, id: &str, draft: EntryDraft) -> StoreResult<Entry> {
        let position = self.position(id)?;
        let entry = Entry::with_id(id, draft)?;
        let mut next = self.entries.clone();
        next[position] = entry.clone();
        self.commit(next, "edit")?;
        Ok(entry)
    }

    /// Removes the entry with `id`, keeping the order of the rest.
    pub fn delete(&mut self, id: &str) -> StoreResult<Entry> {
        let position = self.position(id)?;
        let mut next = self.entries.clone();
        let removed = next.remove(position);
        self.commit(next, "delete")?;
        Ok(removed)
    }

    /// Replaces the whole collection.
    pub fn replace_all(&mut self, entries: Vec<Entry>) -> StoreResult<()> {
        if let Some(id) = find_duplicate_id(&entries) {
            return Err(StoreError::DuplicateId(id.to_string()));
        }
        self.commit(entries, "replace_all")
    }

    /// Removes every entry. Returns how many were removed.
    pub fn clear_all(&mut self) -> StoreResult<usize> {
        let removed = self.entries.len();
        self.commit(Vec::new(), "clear_all")?;
        Ok(removed)
    }

    /// Replaces the collection with the content of a backup file.
    ///
    /// Returns the number of imported entries.
    pub fn import_json(&mut self, contents: &str) -> StoreResult<usize> {
        let entries = transfer::import_from_str(contents)?;
        let imported = entries.len();
        self.commit(entries, "import")?;
        Ok(imported)
    }

    /// Writes a dated backup of the current collection into `dir`.
    pub fn export_to_dir(&self, dir: &Path) -> Result<PathBuf, TransferError> {
        transfer::export_to_file(&self.entries, dir)
    }

    fn position(&self, id: &str) -> StoreResult<usize> {
        self.entries
            .iter()
            .position(|entry| entry.id() == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn commit(&mut self, next: Vec<Entry>, action: &'static str) -> StoreResult<()> {
        save_entries(&self.backend, &next)?;
        self.entries = next;
        info!(
            "event=timetable_mutation module=service status=ok action={action} entries={}",
            self.entries.len()
        );
        Ok(())
    }
}
