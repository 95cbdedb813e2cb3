//! Storage layer for the hebdomad habit engine
//!
//! Persistence is an external collaborator: the engine only speaks to the
//! [`HabitStore`] trait. Two reference backends ship with the crate: an
//! in-memory store (the default, and what tests use) and a SQLite store.
//!
//! Per-(habit, date) completion writes are idempotent, and whole-field
//! writes (archive ranges, display order) are last-write-wins; backends are
//! expected to honor both.

pub mod memory;
pub mod sqlite;

use crate::error::Result;
use crate::types::{ArchiveRange, CompletionRecord, Habit, HabitId, HabitPatch, UserId};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Storage backend trait defining all required operations
///
/// Every call is scoped by an explicit [`UserId`]; nothing in a backend may
/// assume a single ambient user.
#[async_trait]
pub trait HabitStore: Send + Sync {
    /// All habits for a user, ordered by display order
    async fn list_habits(&self, user: &UserId) -> Result<Vec<Habit>>;

    /// Fetch one habit, or `None` if absent
    async fn get_habit(&self, user: &UserId, id: HabitId) -> Result<Option<Habit>>;

    /// Store a new habit record
    async fn insert_habit(&self, user: &UserId, habit: &Habit) -> Result<()>;

    /// Apply a partial update to name/frequency; `NotFound` when absent
    async fn update_habit(&self, user: &UserId, id: HabitId, patch: &HabitPatch) -> Result<()>;

    /// Hard-delete a habit and its completion records; `NotFound` when absent
    async fn delete_habit(&self, user: &UserId, id: HabitId) -> Result<()>;

    /// Write an absolute display-order index for one habit
    async fn set_display_order(&self, user: &UserId, id: HabitId, index: i64) -> Result<()>;

    /// Replace the habit's archive ranges wholesale (no server-side merge)
    async fn set_archive_ranges(
        &self,
        user: &UserId,
        id: HabitId,
        ranges: &[ArchiveRange],
    ) -> Result<()>;

    /// All completion records for one habit
    async fn list_completions(&self, user: &UserId, id: HabitId) -> Result<Vec<CompletionRecord>>;

    /// Set one day's completion; idempotent per (habit, date) key.
    ///
    /// Backends may delete the record on `false`; absence and explicit
    /// false are indistinguishable to callers.
    async fn set_completion(
        &self,
        user: &UserId,
        id: HabitId,
        date: NaiveDate,
        completed: bool,
    ) -> Result<()>;
}
