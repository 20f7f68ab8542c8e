//! Wall-clock time of day and 12-hour display formatting.
//!
//! # Invariants
//! - `ClockTime` can only hold hour in `[0, 23]` and minute in `[0, 59]`.
//! - Hour 0 displays as `12 AM`, hour 12 as `12 PM`.

use crate::model::entry::EntryValidationError;
use std::fmt::{Display, Formatter};

/// Largest valid hour value.
pub const MAX_HOUR: u8 = 23;
/// Largest valid minute value.
pub const MAX_MINUTE: u8 = 59;

/// Validated time of day with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// Builds a time of day, rejecting out-of-range components.
    pub fn new(hour: u8, minute: u8) -> Result<Self, EntryValidationError> {
        if hour > MAX_HOUR {
            return Err(EntryValidationError::HourOutOfRange(hour));
        }
        if minute > MAX_MINUTE {
            return Err(EntryValidationError::MinuteOutOfRange(minute));
        }
        Ok(Self { hour, minute })
    }

    /// Top of the given hour.
    pub fn at_hour(hour: u8) -> Result<Self, EntryValidationError> {
        Self::new(hour, 0)
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }

    /// Default end for a new entry starting at `self`: the next full hour,
    /// clamped to the last hour of the day.
    pub fn default_end(self) -> Self {
        Self {
            hour: (self.hour + 1).min(MAX_HOUR),
            minute: 0,
        }
    }
}

impl Display for ClockTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_clock_time(self.hour, self.minute))
    }
}

/// Formats a 24-hour time as `h:mm AM|PM`, e.g. `(13, 0)` -> `1:00 PM`.
pub fn format_clock_time(hour: u8, minute: u8) -> String {
    format!("{}:{:02} {}", display_hour(hour), minute, period(hour))
}

/// Formats an hour as `h AM|PM`, used for grid row headers and pickers.
pub fn format_hour_label(hour: u8) -> String {
    format!("{} {}", display_hour(hour), period(hour))
}

/// Formats `start - end` the way an entry card shows it.
pub fn format_time_range(start: ClockTime, end: ClockTime) -> String {
    format!("{start} - {end}")
}

/// Parses user-entered time such as `9`, `9:05`, `14:30`, `2pm` or `12 am`.
///
/// Input without an am/pm suffix is read as 24-hour time. With a suffix the
/// hour must be in `1..=12`.
pub fn parse_clock_input(input: &str) -> Option<ClockTime> {
    let input = input.trim().to_ascii_lowercase();
    if input.is_empty() {
        return None;
    }

    let (time_part, meridiem) = if let Some(rest) = input
        .strip_suffix("pm")
        .or_else(|| input.strip_suffix('p'))
    {
        (rest, Some(Meridiem::Pm))
    } else if let Some(rest) = input
        .strip_suffix("am")
        .or_else(|| input.strip_suffix('a'))
    {
        (rest, Some(Meridiem::Am))
    } else {
        (input.as_str(), None)
    };

    let time_part = time_part.trim();
    let (hour, minute) = match time_part.split_once(':') {
        Some((hour, minute)) => (parse_component(hour)?, parse_component(minute)?),
        None => (parse_component(time_part)?, 0),
    };

    let hour = match meridiem {
        None => hour,
        Some(_) if !(1..=12).contains(&hour) => return None,
        Some(Meridiem::Am) => hour % 12,
        Some(Meridiem::Pm) => hour % 12 + 12,
    };

    ClockTime::new(hour, minute).ok()
}

#[derive(Debug, Clone, Copy)]
enum Meridiem {
    Am,
    Pm,
}

fn parse_component(value: &str) -> Option<u8> {
    let value = value.trim();
    if value.is_empty() || value.len() > 2 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

fn display_hour(hour: u8) -> u8 {
    match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    }
}

fn period(hour: u8) -> &'static str {
    if hour >= 12 {
        "PM"
    } else {
        "AM"
    }
}

#[cfg(test)]
mod tests {
    use super::{format_clock_time, format_hour_label, parse_clock_input, ClockTime};
    use crate::model::entry::EntryValidationError;

    #[test]
    fn formats_midnight_noon_and_padding() {
        assert_eq!(format_clock_time(0, 0), "12:00 AM");
        assert_eq!(format_clock_time(0, 5), "12:05 AM");
        assert_eq!(format_clock_time(12, 0), "12:00 PM");
        assert_eq!(format_clock_time(13, 0), "1:00 PM");
        assert_eq!(format_clock_time(23, 59), "11:59 PM");
        assert_eq!(format_clock_time(9, 5), "9:05 AM");
    }

    #[test]
    fn hour_labels_cover_whole_day() {
        assert_eq!(format_hour_label(0), "12 AM");
        assert_eq!(format_hour_label(11), "11 AM");
        assert_eq!(format_hour_label(12), "12 PM");
        assert_eq!(format_hour_label(18), "6 PM");
    }

    #[test]
    fn clock_time_rejects_out_of_range_components() {
        assert_eq!(
            ClockTime::new(24, 0).unwrap_err(),
            EntryValidationError::HourOutOfRange(24)
        );
        assert_eq!(
            ClockTime::new(10, 60).unwrap_err(),
            EntryValidationError::MinuteOutOfRange(60)
        );
    }

    #[test]
    fn default_end_is_next_hour_clamped() {
        let start = ClockTime::new(9, 30).unwrap();
        assert_eq!(start.default_end(), ClockTime::new(10, 0).unwrap());
        let late = ClockTime::new(23, 15).unwrap();
        assert_eq!(late.default_end(), ClockTime::new(23, 0).unwrap());
    }

    #[test]
    fn parses_24_hour_and_meridiem_inputs() {
        assert_eq!(parse_clock_input("9"), ClockTime::new(9, 0).ok());
        assert_eq!(parse_clock_input("14:30"), ClockTime::new(14, 30).ok());
        assert_eq!(parse_clock_input("2pm"), ClockTime::new(14, 0).ok());
        assert_eq!(parse_clock_input(" 9:05 AM "), ClockTime::new(9, 5).ok());
        assert_eq!(parse_clock_input("12am"), ClockTime::new(0, 0).ok());
        assert_eq!(parse_clock_input("12:15p"), ClockTime::new(12, 15).ok());
    }

    #[test]
    fn rejects_malformed_inputs() {
        for input in ["", "pm", "25", "13pm", "0am", "9:75", "nine", "9:5:1", "-1"] {
            assert_eq!(parse_clock_input(input), None, "{input}");
        }
    }
}
