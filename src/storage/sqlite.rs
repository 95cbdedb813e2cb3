//! SQLite storage backend
//!
//! Persistent [`HabitStore`] implementation over an sqlx connection pool.
//! Habits live in one table with archive ranges as a JSON column (the whole
//! field is replaced on write, matching the last-write-wins contract);
//! completions live in a keyed table with delete-on-false semantics.

use crate::error::{HebdomadError, Result};
use crate::storage::HabitStore;
use crate::types::{ArchiveRange, CompletionRecord, Habit, HabitId, HabitPatch, UserId};
use crate::week::{date_key, parse_date_key};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Embedded schema, applied on every connect (idempotent)
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS habits (
    user_id        TEXT NOT NULL,
    id             TEXT NOT NULL,
    name           TEXT NOT NULL,
    frequency      INTEGER NOT NULL,
    display_order  INTEGER NOT NULL DEFAULT 0,
    created_at     TEXT NOT NULL,
    archive_ranges TEXT NOT NULL DEFAULT '[]',
    PRIMARY KEY (user_id, id)
);

CREATE INDEX IF NOT EXISTS idx_habits_user_order
    ON habits(user_id, display_order);

CREATE TABLE IF NOT EXISTS completions (
    user_id   TEXT NOT NULL,
    habit_id  TEXT NOT NULL,
    date      TEXT NOT NULL,
    completed INTEGER NOT NULL DEFAULT 1,
    PRIMARY KEY (user_id, habit_id, date)
);
"#;

/// SQLite habit store
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) a database file and apply the schema
    pub async fn new(path: &Path) -> Result<Self> {
        info!("Opening SQLite habit store at {}", path.display());

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(std::time::Duration::from_secs(30));

        let pool = SqlitePool::connect_with(options).await?;
        sqlx::raw_sql(SCHEMA).execute(&pool).await?;

        Ok(Self { pool })
    }

    /// Open an in-memory database (for tests and ephemeral use)
    ///
    /// Pinned to a single pooled connection that never expires: SQLite's
    /// `:memory:` mode creates an isolated database per connection, so a
    /// second connection would see an empty schema.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(HebdomadError::Storage)?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        sqlx::raw_sql(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    fn row_to_habit(row: &SqliteRow) -> Result<Habit> {
        let id_str: String = row.try_get("id")?;
        let id = HabitId::from_string(&id_str)
            .map_err(|e| HebdomadError::Other(format!("invalid habit id '{}': {}", id_str, e)))?;

        let created_str: String = row.try_get("created_at")?;
        let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_str)
            .map_err(|e| HebdomadError::Other(format!("invalid created_at: {}", e)))?
            .with_timezone(&Utc);

        let ranges_str: String = row.try_get("archive_ranges")?;
        let archive_ranges: Vec<ArchiveRange> = serde_json::from_str(&ranges_str)?;

        Ok(Habit {
            id,
            name: row.try_get("name")?,
            frequency: row.try_get::<i64, _>("frequency")? as u32,
            order: row.try_get("display_order")?,
            created_at,
            archive_ranges,
        })
    }
}

#[async_trait]
impl HabitStore for SqliteStore {
    async fn list_habits(&self, user: &UserId) -> Result<Vec<Habit>> {
        let rows = sqlx::query(
            "SELECT id, name, frequency, display_order, created_at, archive_ranges
             FROM habits WHERE user_id = ?
             ORDER BY display_order, created_at",
        )
        .bind(user.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_habit).collect()
    }

    async fn get_habit(&self, user: &UserId, id: HabitId) -> Result<Option<Habit>> {
        let row = sqlx::query(
            "SELECT id, name, frequency, display_order, created_at, archive_ranges
             FROM habits WHERE user_id = ? AND id = ?",
        )
        .bind(user.as_str())
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_habit).transpose()
    }

    async fn insert_habit(&self, user: &UserId, habit: &Habit) -> Result<()> {
        sqlx::query(
            "INSERT INTO habits
                (user_id, id, name, frequency, display_order, created_at, archive_ranges)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user.as_str())
        .bind(habit.id.to_string())
        .bind(&habit.name)
        .bind(habit.frequency as i64)
        .bind(habit.order)
        .bind(habit.created_at.to_rfc3339())
        .bind(serde_json::to_string(&habit.archive_ranges)?)
        .execute(&self.pool)
        .await?;

        debug!(user = %user, habit = %habit.id, "inserted habit");
        Ok(())
    }

    async fn update_habit(&self, user: &UserId, id: HabitId, patch: &HabitPatch) -> Result<()> {
        let result = sqlx::query(
            "UPDATE habits
             SET name = COALESCE(?, name), frequency = COALESCE(?, frequency)
             WHERE user_id = ? AND id = ?",
        )
        .bind(patch.name.as_deref())
        .bind(patch.frequency.map(|f| f as i64))
        .bind(user.as_str())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(HebdomadError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn delete_habit(&self, user: &UserId, id: HabitId) -> Result<()> {
        let result = sqlx::query("DELETE FROM habits WHERE user_id = ? AND id = ?")
            .bind(user.as_str())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(HebdomadError::NotFound(id.to_string()));
        }

        sqlx::query("DELETE FROM completions WHERE user_id = ? AND habit_id = ?")
            .bind(user.as_str())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        debug!(user = %user, habit = %id, "deleted habit and its completions");
        Ok(())
    }

    async fn set_display_order(&self, user: &UserId, id: HabitId, index: i64) -> Result<()> {
        let result =
            sqlx::query("UPDATE habits SET display_order = ? WHERE user_id = ? AND id = ?")
                .bind(index)
                .bind(user.as_str())
                .bind(id.to_string())
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(HebdomadError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn set_archive_ranges(
        &self,
        user: &UserId,
        id: HabitId,
        ranges: &[ArchiveRange],
    ) -> Result<()> {
        let result =
            sqlx::query("UPDATE habits SET archive_ranges = ? WHERE user_id = ? AND id = ?")
                .bind(serde_json::to_string(ranges)?)
                .bind(user.as_str())
                .bind(id.to_string())
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(HebdomadError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn list_completions(&self, user: &UserId, id: HabitId) -> Result<Vec<CompletionRecord>> {
        let rows = sqlx::query(
            "SELECT date, completed FROM completions WHERE user_id = ? AND habit_id = ?",
        )
        .bind(user.as_str())
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let key: String = row.try_get("date")?;
                Ok(CompletionRecord {
                    date: parse_date_key(&key)?,
                    completed: row.try_get::<i64, _>("completed")? != 0,
                })
            })
            .collect()
    }

    async fn set_completion(
        &self,
        user: &UserId,
        id: HabitId,
        date: NaiveDate,
        completed: bool,
    ) -> Result<()> {
        if completed {
            sqlx::query(
                "INSERT OR REPLACE INTO completions (user_id, habit_id, date, completed)
                 VALUES (?, ?, ?, 1)",
            )
            .bind(user.as_str())
            .bind(id.to_string())
            .bind(date_key(date))
            .execute(&self.pool)
            .await?;
        } else {
            // Delete-on-false: absence already means not completed
            sqlx::query("DELETE FROM completions WHERE user_id = ? AND habit_id = ? AND date = ?")
                .bind(user.as_str())
                .bind(id.to_string())
                .bind(date_key(date))
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }
}
