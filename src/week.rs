//! Calendar week arithmetic
//!
//! All week/date math for the engine lives here: canonical week-start
//! computation, week construction by offset, and the ISO date keys used to
//! address per-day completion records. Keeping this in one place is what
//! stops the "which day does the week start on" question from being answered
//! differently in different call sites.

use crate::error::{HebdomadError, Result};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Canonical week-start: the Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Canonical week-start of an instant.
///
/// A habit created mid-week counts as created from that week's Monday; there
/// is no partial-week visibility. The engine works on a single calendar, so
/// the instant's UTC date is used as-is.
pub fn week_start_of_instant(instant: DateTime<Utc>) -> NaiveDate {
    week_start(instant.date_naive())
}

/// Storage key for a calendar date, e.g. `2024-01-08`.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a storage key produced by [`date_key`].
pub fn parse_date_key(key: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d")
        .map_err(|e| HebdomadError::Validation(format!("invalid date key '{}': {}", key, e)))
}

/// A displayed calendar week: seven consecutive days anchored on Monday.
///
/// Weeks are derived values, never persisted. Offset 0 is the week containing
/// the reference date; negative offsets move backward, positive forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Week {
    start: NaiveDate,
}

impl Week {
    /// The week containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            start: week_start(date),
        }
    }

    /// The week containing today (local calendar).
    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    /// The week `offset` weeks away from the one containing `date`.
    pub fn containing_with_offset(date: NaiveDate, offset: i64) -> Self {
        Self {
            start: week_start(date) + Duration::weeks(offset),
        }
    }

    /// The week `offset` weeks away from the current one.
    pub fn with_offset(offset: i64) -> Self {
        Self::containing_with_offset(Local::now().date_naive(), offset)
    }

    /// Construct from an explicit week-start. Rejects non-Monday dates so a
    /// misaligned anchor cannot silently shift every derived key.
    pub fn from_start(start: NaiveDate) -> Result<Self> {
        if start.weekday() != Weekday::Mon {
            return Err(HebdomadError::Validation(format!(
                "week start {} is a {}, expected Monday",
                start,
                start.weekday()
            )));
        }
        Ok(Self { start })
    }

    /// Monday of this week.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Sunday of this week (inclusive).
    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(6)
    }

    /// The seven days, Monday through Sunday.
    pub fn days(&self) -> [NaiveDate; 7] {
        std::array::from_fn(|i| self.start + Duration::days(i as i64))
    }

    /// Whether `date` falls inside this week.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end()
    }

    /// The week immediately after this one.
    pub fn next(&self) -> Self {
        Self {
            start: self.start + Duration::weeks(1),
        }
    }

    /// The week immediately before this one.
    pub fn prev(&self) -> Self {
        Self {
            start: self.start - Duration::weeks(1),
        }
    }
}

impl std::fmt::Display for Week {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "week of {}", date_key(self.start))
    }
}
