//! Core use-case services.
//!
//! # Responsibility
//! - Own the in-memory timetable and orchestrate persistence calls.
//! - Keep CLI/FFI layers decoupled from storage details.

pub mod timetable_store;
