//! Aggregated week view
//!
//! [`WeekView`] is what a caller renders: the visible habits for one week,
//! a per-day status map, and a per-habit completion count. The two maps are
//! kept consistent by construction and by [`WeekView::set_status`]: the
//! count for a habit always equals the number of true entries among its
//! seven day keys.
//!
//! The view is `Clone` on purpose: optimistic UI flows snapshot it, mutate
//! locally with `set_status` before the remote write resolves, and restore
//! the snapshot if persistence fails. The engine keeps no transactional log.

use crate::error::{HebdomadError, Result};
use crate::types::{CompletionRecord, Habit, HabitId};
use crate::week::Week;
use chrono::NaiveDate;
use std::collections::HashMap;

/// One week's worth of visible habits and their completion state
#[derive(Debug, Clone, PartialEq)]
pub struct WeekView {
    week: Week,
    habits: Vec<Habit>,
    status: HashMap<(HabitId, NaiveDate), bool>,
    completions: HashMap<HabitId, u32>,
}

impl WeekView {
    /// Build a view from visible habits and their completion records.
    ///
    /// Exactly 7 status keys are materialized per habit; records outside the
    /// week are ignored, and missing records read as false.
    pub(crate) fn build(week: Week, entries: Vec<(Habit, Vec<CompletionRecord>)>) -> Self {
        let mut status = HashMap::with_capacity(entries.len() * 7);
        let mut completions = HashMap::with_capacity(entries.len());
        let mut habits = Vec::with_capacity(entries.len());

        for (habit, records) in entries {
            let mut count = 0u32;
            for day in week.days() {
                let done = records
                    .iter()
                    .find(|r| r.date == day)
                    .map_or(false, |r| r.completed);
                if done {
                    count += 1;
                }
                status.insert((habit.id, day), done);
            }
            completions.insert(habit.id, count);
            habits.push(habit);
        }

        Self {
            week,
            habits,
            status,
            completions,
        }
    }

    /// The week this view was requested for.
    ///
    /// Echoed so a caller racing two loads can discard the stale response.
    pub fn week(&self) -> Week {
        self.week
    }

    /// Visible habits in display order
    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    /// Look up a habit by id
    pub fn habit(&self, id: HabitId) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    /// Completion state for one habit on one day (false if unknown)
    pub fn status(&self, habit: HabitId, date: NaiveDate) -> bool {
        self.status.get(&(habit, date)).copied().unwrap_or(false)
    }

    /// Number of completed days this week for one habit
    pub fn completed_count(&self, habit: HabitId) -> u32 {
        self.completions.get(&habit).copied().unwrap_or(0)
    }

    /// Completion ratio against the habit's weekly target.
    ///
    /// Not clamped: a habit done more often than its target reads above 1.0,
    /// and a zero frequency counts as 1 so the ratio is always finite.
    pub fn progress(&self, habit: HabitId) -> Option<f64> {
        let target = self.habit(habit)?.effective_frequency();
        Some(self.completed_count(habit) as f64 / target as f64)
    }

    /// Set one day's completion locally, keeping the count consistent.
    ///
    /// Returns the prior value. This is the optimistic-update entry point;
    /// it never touches storage. Rejects dates outside the view's week and
    /// habits the view does not contain.
    pub fn set_status(&mut self, habit: HabitId, date: NaiveDate, value: bool) -> Result<bool> {
        if !self.week.contains(date) {
            return Err(HebdomadError::Validation(format!(
                "date {} is outside {}",
                date, self.week
            )));
        }
        if self.habit(habit).is_none() {
            return Err(HebdomadError::NotFound(habit.to_string()));
        }

        let slot = self
            .status
            .get_mut(&(habit, date))
            .ok_or_else(|| HebdomadError::NotFound(habit.to_string()))?;
        let prior = *slot;
        *slot = value;

        if prior != value {
            let count = self.completions.entry(habit).or_insert(0);
            if value {
                *count += 1;
            } else {
                *count = count.saturating_sub(1);
            }
        }

        Ok(prior)
    }

    /// Verify the count/status invariant for every habit; test support
    #[cfg(test)]
    fn assert_consistent(&self) {
        for habit in &self.habits {
            let counted = self
                .week
                .days()
                .iter()
                .filter(|d| self.status(habit.id, **d))
                .count() as u32;
            assert_eq!(counted, self.completed_count(habit.id), "habit {}", habit.id);
        }
    }
}
