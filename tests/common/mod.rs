//! Common test utilities and helpers

use chrono::{NaiveDate, TimeZone, Utc};
use hebdomad::{Habit, HabitStore, HabitTracker, MemoryStore, UserId, Week};
use std::sync::{Arc, Once};

static TRACING: Once = Once::new();

/// Install a log subscriber once per test binary; `RUST_LOG` controls
/// verbosity when debugging a failing test
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// A tracker over a fresh in-memory store
pub fn create_test_tracker() -> HabitTracker {
    init_tracing();
    HabitTracker::new(Arc::new(MemoryStore::new()))
}

pub fn test_user() -> UserId {
    UserId::from("test-user")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// The week of Monday 2024-01-08, used as the standard fixture week
pub fn fixture_week() -> Week {
    Week::from_start(date(2024, 1, 8)).unwrap()
}

/// A habit created Wednesday 2024-01-10 (week of 2024-01-08)
pub fn habit_created_jan_10(name: &str, frequency: u32) -> Habit {
    let mut habit = Habit::new(name, frequency);
    habit.created_at = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
    habit
}

/// Seed a habit with a fixed creation date directly into the tracker's store
pub async fn seed_habit(tracker: &HabitTracker, user: &UserId, habit: &Habit) {
    tracker
        .store()
        .insert_habit(user, habit)
        .await
        .expect("failed to seed habit");
}
