//! Habit visibility for a target week
//!
//! Decides whether a habit belongs in a given week's view. Two temporal
//! facts gate this independently: the habit cannot appear before the week it
//! was created in, and it is hidden for any week covered by one of its
//! archive ranges. Pure functions of (habit, week); no I/O.

use crate::types::Habit;
use chrono::NaiveDate;

/// Whether `habit` should appear in the week starting at `target_week_start`.
///
/// `target_week_start` must be a canonical week-start (callers pass
/// [`Week::start`](crate::week::Week::start)). Overlapping archive ranges
/// are tolerated and act as their union.
pub fn is_visible(habit: &Habit, target_week_start: NaiveDate) -> bool {
    if target_week_start < habit.created_week_start() {
        return false;
    }

    !habit
        .archive_ranges
        .iter()
        .any(|range| range.contains_week(target_week_start))
}
