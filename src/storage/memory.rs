//! In-memory storage backend
//!
//! Reference implementation of [`HabitStore`] used as the default backend
//! and throughout the test suite. Completion records are delete-on-false:
//! only true entries are kept, which keeps absence and explicit false
//! externally indistinguishable.

use crate::error::{HebdomadError, Result};
use crate::storage::HabitStore;
use crate::types::{ArchiveRange, CompletionRecord, Habit, HabitId, HabitPatch, UserId};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
struct UserData {
    habits: HashMap<HabitId, Habit>,
    /// Only true entries are stored; a missing key reads as not completed
    completions: HashMap<(HabitId, NaiveDate), bool>,
}

/// In-memory habit store
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<UserId, UserData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn not_found(id: HabitId) -> HebdomadError {
        HebdomadError::NotFound(id.to_string())
    }
}

#[async_trait]
impl HabitStore for MemoryStore {
    async fn list_habits(&self, user: &UserId) -> Result<Vec<Habit>> {
        let users = self.users.read().await;
        let mut habits: Vec<Habit> = users
            .get(user)
            .map(|data| data.habits.values().cloned().collect())
            .unwrap_or_default();
        habits.sort_by(|a, b| a.order.cmp(&b.order).then(a.created_at.cmp(&b.created_at)));
        Ok(habits)
    }

    async fn get_habit(&self, user: &UserId, id: HabitId) -> Result<Option<Habit>> {
        let users = self.users.read().await;
        Ok(users.get(user).and_then(|data| data.habits.get(&id)).cloned())
    }

    async fn insert_habit(&self, user: &UserId, habit: &Habit) -> Result<()> {
        let mut users = self.users.write().await;
        users
            .entry(user.clone())
            .or_default()
            .habits
            .insert(habit.id, habit.clone());
        debug!(user = %user, habit = %habit.id, "inserted habit");
        Ok(())
    }

    async fn update_habit(&self, user: &UserId, id: HabitId, patch: &HabitPatch) -> Result<()> {
        let mut users = self.users.write().await;
        let habit = users
            .get_mut(user)
            .and_then(|data| data.habits.get_mut(&id))
            .ok_or_else(|| Self::not_found(id))?;

        if let Some(name) = &patch.name {
            habit.name = name.clone();
        }
        if let Some(frequency) = patch.frequency {
            habit.frequency = frequency;
        }
        Ok(())
    }

    async fn delete_habit(&self, user: &UserId, id: HabitId) -> Result<()> {
        let mut users = self.users.write().await;
        let data = users.get_mut(user).ok_or_else(|| Self::not_found(id))?;
        data.habits.remove(&id).ok_or_else(|| Self::not_found(id))?;
        data.completions.retain(|(habit, _), _| *habit != id);
        debug!(user = %user, habit = %id, "deleted habit");
        Ok(())
    }

    async fn set_display_order(&self, user: &UserId, id: HabitId, index: i64) -> Result<()> {
        let mut users = self.users.write().await;
        let habit = users
            .get_mut(user)
            .and_then(|data| data.habits.get_mut(&id))
            .ok_or_else(|| Self::not_found(id))?;
        habit.order = index;
        Ok(())
    }

    async fn set_archive_ranges(
        &self,
        user: &UserId,
        id: HabitId,
        ranges: &[ArchiveRange],
    ) -> Result<()> {
        let mut users = self.users.write().await;
        let habit = users
            .get_mut(user)
            .and_then(|data| data.habits.get_mut(&id))
            .ok_or_else(|| Self::not_found(id))?;
        habit.archive_ranges = ranges.to_vec();
        Ok(())
    }

    async fn list_completions(&self, user: &UserId, id: HabitId) -> Result<Vec<CompletionRecord>> {
        let users = self.users.read().await;
        Ok(users
            .get(user)
            .map(|data| {
                data.completions
                    .iter()
                    .filter(|((habit, _), _)| *habit == id)
                    .map(|((_, date), completed)| CompletionRecord {
                        date: *date,
                        completed: *completed,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn set_completion(
        &self,
        user: &UserId,
        id: HabitId,
        date: NaiveDate,
        completed: bool,
    ) -> Result<()> {
        let mut users = self.users.write().await;
        let data = users.entry(user.clone()).or_default();
        if completed {
            data.completions.insert((id, date), true);
        } else {
            // Delete-on-false: absence already means not completed
            data.completions.remove(&(id, date));
        }
        Ok(())
    }
}
