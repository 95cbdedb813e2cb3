//! Hebdomad - Weekly Habit Tracking Engine
//!
//! An embedded library that decides, for an arbitrary requested week, which
//! habits should be shown and what each habit's completion state is, and
//! keeps those aggregates consistent as single days are toggled. It
//! reconciles three independently varying temporal facts: a habit's creation
//! date, its history of archive/unarchive intervals, and its set of
//! completed dates.
//!
//! # Architecture
//!
//! - **Types**: Core data structures (Habit, ArchiveRange, CompletionRecord)
//! - **Week**: All calendar-week arithmetic, in one place
//! - **Visibility / Archive**: Pure per-week visibility rules and the
//!   archive-range state machine
//! - **View**: The aggregated [`WeekView`] with its count/status invariant
//! - **Tracker**: The caller-facing service over a pluggable [`HabitStore`]
//! - **Storage**: In-memory and SQLite backends
//!
//! # Example
//!
//! ```ignore
//! use hebdomad::{HabitTracker, TrackerConfig, UserId, Week};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let tracker = HabitTracker::from_config(&TrackerConfig::default()).await?;
//!     let user = UserId::from("u-1");
//!
//!     let id = tracker.create_habit(&user, "Morning run", 3).await?;
//!
//!     let week = Week::current();
//!     let mut view = tracker.load_week(&user, week).await?;
//!
//!     // Optimistic toggle: update locally, persist, roll back on failure
//!     let today = week.days()[0];
//!     let snapshot = view.clone();
//!     let prior = view.set_status(id, today, true)?;
//!     if tracker.toggle(&user, id, today, prior, &week).await.is_err() {
//!         view = snapshot;
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod config;
pub mod error;
pub mod storage;
pub mod tracker;
pub mod types;
pub mod view;
pub mod visibility;
pub mod week;

// Re-export commonly used types
pub use config::{StorageConfig, TrackerConfig};
pub use error::{HebdomadError, Result};
pub use storage::{memory::MemoryStore, sqlite::SqliteStore, HabitStore};
pub use tracker::HabitTracker;
pub use types::{ArchiveRange, CompletionRecord, Habit, HabitId, HabitPatch, UserId};
pub use view::WeekView;
pub use visibility::is_visible;
pub use week::Week;
