//! Core data types for the hebdomad habit engine
//!
//! This module defines the fundamental data structures used throughout the
//! crate: habits, archive ranges, per-day completion records, and the opaque
//! identifiers that scope everything to a single user.

use crate::week;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for habits
///
/// Wraps a UUID to provide type safety and prevent mixing habit IDs with
/// other identifiers in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(pub Uuid);

impl HabitId {
    /// Create a new random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a habit ID from a string
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for HabitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque user identifier
///
/// Every store call takes one explicitly; there is no ambient "current user"
/// anywhere in the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A contiguous span of calendar weeks during which a habit is hidden
///
/// Both bounds are canonical week-starts (Mondays); `end` is inclusive and
/// `None` means the habit is hidden from `start` onward, indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveRange {
    /// First hidden week (canonical week-start)
    pub start: NaiveDate,

    /// Last hidden week (canonical week-start), or open
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
}

impl ArchiveRange {
    /// An open range hiding the habit from `start` onward
    pub fn open(start: NaiveDate) -> Self {
        Self { start, end: None }
    }

    /// A closed range hiding the habit for `start..=end`
    pub fn closed(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// Whether this range has no end yet
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Whether `week_start` falls inside this range
    pub fn contains_week(&self, week_start: NaiveDate) -> bool {
        self.start <= week_start && self.end.map_or(true, |end| week_start <= end)
    }
}

/// A recurring habit with a weekly target frequency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique id, scoped to the owning user
    pub id: HabitId,

    /// Display name (non-empty)
    pub name: String,

    /// Weekly target: how many days per week the habit should be done
    pub frequency: u32,

    /// Display order; used for stable sorting, not necessarily contiguous
    pub order: i64,

    /// Creation instant; the habit is never visible before the week
    /// containing it
    pub created_at: DateTime<Utc>,

    /// Spans of weeks during which the habit is hidden
    #[serde(default)]
    pub archive_ranges: Vec<ArchiveRange>,
}

impl Habit {
    /// Create a fresh habit with order 0 and `created_at = now`
    pub fn new(name: impl Into<String>, frequency: u32) -> Self {
        Self {
            id: HabitId::new(),
            name: name.into(),
            frequency,
            order: 0,
            created_at: Utc::now(),
            archive_ranges: Vec::new(),
        }
    }

    /// Canonical week-start of the creation instant
    pub fn created_week_start(&self) -> NaiveDate {
        week::week_start_of_instant(self.created_at)
    }

    /// Whether the habit currently has an open archive range
    pub fn is_archived(&self) -> bool {
        self.archive_ranges.iter().any(ArchiveRange::is_open)
    }

    /// Weekly target, never zero: a zero or unset frequency counts as 1 so
    /// progress ratios cannot divide by zero
    pub fn effective_frequency(&self) -> u32 {
        self.frequency.max(1)
    }
}

/// Partial update for a habit's editable fields
///
/// Only supplied fields are written; the rest of the record is untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<u32>,
}

impl HabitPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.frequency.is_none()
    }
}

/// A per-day boolean fact recording whether a habit was performed
///
/// Absence of a record is equivalent to `completed = false`; backends may
/// delete records instead of storing explicit false values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    /// Calendar date the completion applies to
    pub date: NaiveDate,

    /// Whether the habit was performed that day
    pub completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_habit_id_creation() {
        let id1 = HabitId::new();
        let id2 = HabitId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_habit_id_round_trip() {
        let id = HabitId::new();
        let parsed = HabitId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_archive_range_contains_week() {
        let closed = ArchiveRange::closed(date(2024, 2, 5), date(2024, 2, 19));
        assert!(!closed.contains_week(date(2024, 1, 29)));
        assert!(closed.contains_week(date(2024, 2, 5)));
        assert!(closed.contains_week(date(2024, 2, 12)));
        assert!(closed.contains_week(date(2024, 2, 19)));
        assert!(!closed.contains_week(date(2024, 2, 26)));

        let open = ArchiveRange::open(date(2024, 2, 5));
        assert!(open.contains_week(date(2030, 1, 7)));
        assert!(!open.contains_week(date(2024, 1, 29)));
    }

    #[test]
    fn test_is_archived_tracks_open_range() {
        let mut habit = Habit::new("Read", 3);
        assert!(!habit.is_archived());

        habit
            .archive_ranges
            .push(ArchiveRange::closed(date(2024, 2, 5), date(2024, 2, 19)));
        assert!(!habit.is_archived());

        habit.archive_ranges.push(ArchiveRange::open(date(2024, 3, 4)));
        assert!(habit.is_archived());
    }

    #[test]
    fn test_effective_frequency_never_zero() {
        let mut habit = Habit::new("Stretch", 0);
        assert_eq!(habit.effective_frequency(), 1);
        habit.frequency = 5;
        assert_eq!(habit.effective_frequency(), 5);
    }

    #[test]
    fn test_created_week_start() {
        let mut habit = Habit::new("Run", 3);
        habit.created_at = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
        assert_eq!(habit.created_week_start(), date(2024, 1, 8));
    }

    #[test]
    fn test_archive_range_serde_omits_open_end() {
        let open = ArchiveRange::open(date(2024, 3, 4));
        let json = serde_json::to_string(&open).unwrap();
        assert!(!json.contains("end"));

        let back: ArchiveRange = serde_json::from_str(&json).unwrap();
        assert!(back.is_open());
    }
}
