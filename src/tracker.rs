//! Habit tracker service
//!
//! The caller-facing surface: weekly views, day toggles, archive
//! transitions, and the create/update/delete/reorder passthroughs. Holds a
//! storage backend behind [`HabitStore`] and is otherwise stateless: every
//! [`load_week`](HabitTracker::load_week) is a fresh read, and optimistic
//! update/rollback is the caller's job (see [`WeekView`]).

use crate::archive;
use crate::config::{StorageConfig, TrackerConfig};
use crate::error::{HebdomadError, Result};
use crate::storage::{memory::MemoryStore, sqlite::SqliteStore, HabitStore};
use crate::types::{ArchiveRange, Habit, HabitId, HabitPatch, UserId};
use crate::view::WeekView;
use crate::visibility::is_visible;
use crate::week::Week;
use chrono::NaiveDate;
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info};

/// Habit tracking engine over a pluggable store
pub struct HabitTracker {
    store: Arc<dyn HabitStore>,
}

impl HabitTracker {
    /// Wrap an existing storage backend
    pub fn new(store: Arc<dyn HabitStore>) -> Self {
        Self { store }
    }

    /// Build a tracker with the backend named by `config`
    pub async fn from_config(config: &TrackerConfig) -> Result<Self> {
        let store: Arc<dyn HabitStore> = match &config.storage {
            StorageConfig::Memory => Arc::new(MemoryStore::new()),
            StorageConfig::Sqlite { path } => Arc::new(SqliteStore::new(path).await?),
        };
        Ok(Self::new(store))
    }

    /// Access the underlying store
    pub fn store(&self) -> &Arc<dyn HabitStore> {
        &self.store
    }

    fn validate_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(HebdomadError::Validation(
                "habit name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_frequency(frequency: u32) -> Result<()> {
        if frequency == 0 {
            return Err(HebdomadError::Validation(
                "frequency must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Create a habit with order 0 and `created_at = now`
    pub async fn create_habit(
        &self,
        user: &UserId,
        name: &str,
        frequency: u32,
    ) -> Result<HabitId> {
        Self::validate_name(name)?;
        Self::validate_frequency(frequency)?;

        let habit = Habit::new(name.trim(), frequency);
        let id = habit.id;
        self.store.insert_habit(user, &habit).await?;

        info!(user = %user, habit = %id, name = %habit.name, "created habit");
        Ok(id)
    }

    /// Fetch one habit; `NotFound` when absent
    pub async fn get_habit(&self, user: &UserId, id: HabitId) -> Result<Habit> {
        self.store
            .get_habit(user, id)
            .await?
            .ok_or_else(|| HebdomadError::NotFound(id.to_string()))
    }

    /// Rename and/or retarget a habit; supplied fields are validated the
    /// same way as at creation
    pub async fn update_habit(&self, user: &UserId, id: HabitId, patch: HabitPatch) -> Result<()> {
        if let Some(name) = &patch.name {
            Self::validate_name(name)?;
        }
        if let Some(frequency) = patch.frequency {
            Self::validate_frequency(frequency)?;
        }
        if patch.is_empty() {
            // Nothing to write, but an absent habit is still an error
            self.get_habit(user, id).await?;
            return Ok(());
        }

        // Names persist trimmed, same as at creation
        let patch = HabitPatch {
            name: patch.name.map(|n| n.trim().to_string()),
            frequency: patch.frequency,
        };
        self.store.update_habit(user, id, &patch).await
    }

    /// Hard-delete a habit and its completion history
    pub async fn delete_habit(&self, user: &UserId, id: HabitId) -> Result<()> {
        self.store.delete_habit(user, id).await?;
        info!(user = %user, habit = %id, "deleted habit");
        Ok(())
    }

    /// Load one week's view: habits visible that week, their per-day status,
    /// and per-habit completion counts.
    ///
    /// All-or-nothing: a failure fetching any habit's completions fails the
    /// whole load rather than silently zeroing that habit's aggregate. The
    /// requested week is echoed in the result so callers can drop stale
    /// responses from superseded loads.
    pub async fn load_week(&self, user: &UserId, week: Week) -> Result<WeekView> {
        let habits = self.store.list_habits(user).await?;
        let visible: Vec<Habit> = habits
            .into_iter()
            .filter(|h| is_visible(h, week.start()))
            .collect();

        debug!(user = %user, %week, count = visible.len(), "loading week view");

        let completions = try_join_all(
            visible
                .iter()
                .map(|habit| self.store.list_completions(user, habit.id)),
        )
        .await?;

        let entries = visible.into_iter().zip(completions).collect();
        Ok(WeekView::build(week, entries))
    }

    /// Flip one day's persisted completion and return the new value.
    ///
    /// `date` must fall inside `week` (checked before any I/O). Whether a
    /// future week may be toggled at all is a presentation-layer policy and
    /// is not enforced here. The caller applies its optimistic
    /// [`WeekView::set_status`] update before awaiting this, and restores
    /// its snapshot if this errs.
    pub async fn toggle(
        &self,
        user: &UserId,
        id: HabitId,
        date: NaiveDate,
        current: bool,
        week: &Week,
    ) -> Result<bool> {
        if !week.contains(date) {
            return Err(HebdomadError::Validation(format!(
                "toggle date {} is outside {}",
                date, week
            )));
        }

        let new_value = !current;
        self.store.set_completion(user, id, date, new_value).await?;

        debug!(user = %user, habit = %id, %date, new_value, "toggled completion");
        Ok(new_value)
    }

    /// Archive or un-archive a habit as of `target_week`, returning the full
    /// new range sequence that was persisted
    pub async fn set_archived(
        &self,
        user: &UserId,
        id: HabitId,
        archived: bool,
        target_week: Week,
    ) -> Result<Vec<ArchiveRange>> {
        let habit = self.get_habit(user, id).await?;
        let ranges = archive::set_archived(&habit.archive_ranges, archived, target_week.start())?;
        self.store.set_archive_ranges(user, id, &ranges).await?;

        info!(user = %user, habit = %id, archived, %target_week, "updated archive state");
        Ok(ranges)
    }

    /// Habits currently hidden by an open archive range
    pub async fn list_archived(&self, user: &UserId) -> Result<Vec<Habit>> {
        let habits = self.store.list_habits(user).await?;
        Ok(habits.into_iter().filter(Habit::is_archived).collect())
    }

    /// Persist a new display order: each habit gets its index in
    /// `ordered_ids` as an absolute position.
    ///
    /// Writes are issued concurrently and joined; each sets an absolute
    /// index, so completion order between them does not matter.
    pub async fn reorder(&self, user: &UserId, ordered_ids: &[HabitId]) -> Result<()> {
        try_join_all(
            ordered_ids
                .iter()
                .enumerate()
                .map(|(index, id)| self.store.set_display_order(user, *id, index as i64)),
        )
        .await?;

        debug!(user = %user, count = ordered_ids.len(), "reordered habits");
        Ok(())
    }
}
