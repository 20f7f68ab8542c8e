//! Timetable entry model.
//!
//! # Responsibility
//! - Define the canonical scheduled-activity record and its JSON wire shape.
//! - Normalize user input (`EntryDraft`) into valid entries.
//!
//! # Invariants
//! - `id` is non-empty, stable and never reused for another entry.
//! - `subject` is trimmed and non-empty.
//! - `homework` is either `None` or trimmed non-empty text.
//! - `color == classify_subject(subject)` for every constructed entry; the
//!   wire `color` field is ignored on read and recomputed.
//! - End time is NOT required to be after start time.

use crate::model::clock::{format_time_range, ClockTime};
use crate::model::subject::{classify_subject, EntryColor};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of one entry.
///
/// Kept as a string because imported backups may carry ids minted elsewhere.
pub type EntryId = String;

/// Validation error for entry construction and persisted/imported data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    EmptyId,
    EmptySubject,
    HourOutOfRange(u8),
    MinuteOutOfRange(u8),
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "entry id cannot be empty"),
            Self::EmptySubject => write!(f, "subject cannot be empty"),
            Self::HourOutOfRange(hour) => write!(f, "hour ({hour}) must be within 0..=23"),
            Self::MinuteOutOfRange(minute) => {
                write!(f, "minute ({minute}) must be within 0..=59")
            }
        }
    }
}

impl Error for EntryValidationError {}

/// User input for creating or editing an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub subject: String,
    pub start: ClockTime,
    pub end: ClockTime,
    pub homework: Option<String>,
}

impl EntryDraft {
    pub fn new(subject: impl Into<String>, start: ClockTime, end: ClockTime) -> Self {
        Self {
            subject: subject.into(),
            start,
            end,
            homework: None,
        }
    }

    pub fn with_homework(mut self, homework: impl Into<String>) -> Self {
        self.homework = Some(homework.into());
        self
    }
}

/// One scheduled activity on today's timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EntryRecord", into = "EntryRecord")]
pub struct Entry {
    id: EntryId,
    subject: String,
    start: ClockTime,
    end: ClockTime,
    homework: Option<String>,
    color: EntryColor,
}

impl Entry {
    /// Creates an entry from a draft with a freshly generated id.
    pub fn new(draft: EntryDraft) -> Result<Self, EntryValidationError> {
        Self::with_id(Uuid::new_v4().to_string(), draft)
    }

    /// Creates an entry from a draft keeping a caller-provided id.
    ///
    /// Used by edit (id-matched replacement) and by import paths.
    pub fn with_id(
        id: impl Into<EntryId>,
        draft: EntryDraft,
    ) -> Result<Self, EntryValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(EntryValidationError::EmptyId);
        }

        let subject = draft.subject.trim().to_string();
        if subject.is_empty() {
            return Err(EntryValidationError::EmptySubject);
        }

        let homework = draft
            .homework
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        let color = classify_subject(&subject);

        Ok(Self {
            id,
            subject,
            start: draft.start,
            end: draft.end,
            homework,
            color,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn start(&self) -> ClockTime {
        self.start
    }

    pub fn end(&self) -> ClockTime {
        self.end
    }

    /// Start hour; the grid buckets entries by this value only.
    pub fn hour(&self) -> u8 {
        self.start.hour()
    }

    pub fn homework(&self) -> Option<&str> {
        self.homework.as_deref()
    }

    pub fn color(&self) -> EntryColor {
        self.color
    }

    /// `9:00 AM - 10:00 AM` style label.
    pub fn time_range_label(&self) -> String {
        format_time_range(self.start, self.end)
    }

    /// Returns the editable fields of this entry, e.g. to prefill an edit form.
    pub fn to_draft(&self) -> EntryDraft {
        EntryDraft {
            subject: self.subject.clone(),
            start: self.start,
            end: self.end,
            homework: self.homework.clone(),
        }
    }
}

/// JSON wire shape shared by local storage and backup files.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryRecord {
    id: String,
    subject: String,
    hour: u8,
    minute: u8,
    end_hour: u8,
    end_minute: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    homework: Option<String>,
    #[serde(skip_deserializing)]
    color: EntryColor,
}

impl TryFrom<EntryRecord> for Entry {
    type Error = EntryValidationError;

    fn try_from(record: EntryRecord) -> Result<Self, Self::Error> {
        let draft = EntryDraft {
            subject: record.subject,
            start: ClockTime::new(record.hour, record.minute)?,
            end: ClockTime::new(record.end_hour, record.end_minute)?,
            homework: record.homework,
        };
        Entry::with_id(record.id, draft)
    }
}

impl From<Entry> for EntryRecord {
    fn from(entry: Entry) -> Self {
        Self {
            id: entry.id,
            subject: entry.subject,
            hour: entry.start.hour(),
            minute: entry.start.minute(),
            end_hour: entry.end.hour(),
            end_minute: entry.end.minute(),
            homework: entry.homework,
            color: entry.color,
        }
    }
}
