//! Timetable domain model.
//!
//! # Responsibility
//! - Define the entry shape shared by storage, transfer and view layers.
//! - Provide pure helpers for clock formatting and subject categorization.
//!
//! # Invariants
//! - Every entry is identified by a stable string id that is never reused.
//! - Entry color is always derived from the subject, never taken from input.

pub mod clock;
pub mod entry;
pub mod subject;
pub mod timetable;
