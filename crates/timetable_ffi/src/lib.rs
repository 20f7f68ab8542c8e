//! FFI bridge crate consumed by the Flutter timetable shell.

pub mod api;
