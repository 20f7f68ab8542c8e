//! Subject categorization.
//!
//! # Invariants
//! - Keyword table order is fixed; the first matching keyword wins.
//! - Subjects that match no keyword fall back to `EntryColor::Default`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Closed set of color categories an entry can be rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryColor {
    Math,
    English,
    Science,
    History,
    #[default]
    Default,
}

impl EntryColor {
    /// All categories in display order.
    pub const ALL: [EntryColor; 5] = [
        EntryColor::Math,
        EntryColor::English,
        EntryColor::Science,
        EntryColor::History,
        EntryColor::Default,
    ];

    /// Stable wire value used in persisted and exported JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Math => "math",
            Self::English => "english",
            Self::Science => "science",
            Self::History => "history",
            Self::Default => "default",
        }
    }
}

impl Display for EntryColor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const SUBJECT_KEYWORDS: &[(&str, EntryColor)] = &[
    ("math", EntryColor::Math),
    ("mathematics", EntryColor::Math),
    ("english", EntryColor::English),
    ("language", EntryColor::English),
    ("science", EntryColor::Science),
    ("biology", EntryColor::Science),
    ("chemistry", EntryColor::Science),
    ("physics", EntryColor::Science),
    ("history", EntryColor::History),
    ("social", EntryColor::History),
];

/// Maps a free-text subject onto its color category.
///
/// Matching is case-insensitive substring search over the keyword table.
pub fn classify_subject(subject: &str) -> EntryColor {
    let lower = subject.to_lowercase();
    SUBJECT_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(*keyword))
        .map_or(EntryColor::Default, |(_, color)| *color)
}
