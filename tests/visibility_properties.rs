//! Property tests for the pure week/visibility/archive functions

use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
use hebdomad::{archive, is_visible, week, ArchiveRange, Habit};
use proptest::prelude::*;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 3).unwrap() // a Monday
}

/// Arbitrary calendar date within a few decades of the base
fn any_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..15_000).prop_map(|d| base_date() + Duration::days(d))
}

/// Arbitrary canonical week-start
fn any_week_start() -> impl Strategy<Value = NaiveDate> {
    (0i64..2_000).prop_map(|w| base_date() + Duration::weeks(w))
}

fn habit_created_on(date: NaiveDate) -> Habit {
    let mut habit = Habit::new("Prop", 3);
    habit.created_at = Utc
        .with_ymd_and_hms(date.year(), date.month(), date.day(), 12, 0, 0)
        .unwrap();
    habit
}

proptest! {
    #[test]
    fn week_start_is_monday_within_six_days(date in any_date()) {
        let start = week::week_start(date);
        prop_assert_eq!(start.weekday(), Weekday::Mon);
        prop_assert!(start <= date);
        prop_assert!(date - start < Duration::days(7));
    }

    #[test]
    fn week_start_is_idempotent(date in any_date()) {
        let start = week::week_start(date);
        prop_assert_eq!(week::week_start(start), start);
    }

    #[test]
    fn never_visible_before_creation_week(
        created in any_date(),
        target in any_week_start(),
    ) {
        let habit = habit_created_on(created);
        if target < week::week_start(created) {
            prop_assert!(!is_visible(&habit, target));
        }
    }

    #[test]
    fn always_visible_after_creation_without_ranges(
        created in any_date(),
        target in any_week_start(),
    ) {
        let habit = habit_created_on(created);
        if target >= week::week_start(created) {
            prop_assert!(is_visible(&habit, target));
        }
    }

    #[test]
    fn closed_range_hides_exactly_its_span(
        range_start in 0i64..1_000,
        len_weeks in 0i64..50,
        probe in 0i64..1_100,
    ) {
        let start = base_date() + Duration::weeks(range_start);
        let end = start + Duration::weeks(len_weeks);
        let target = base_date() + Duration::weeks(probe);

        let mut habit = habit_created_on(base_date());
        habit.archive_ranges.push(ArchiveRange::closed(start, end));

        let hidden = start <= target && target <= end;
        prop_assert_eq!(is_visible(&habit, target), !hidden);
    }

    #[test]
    fn archive_round_trip_adds_one_closed_range(
        existing_closed in 0usize..4,
        archive_week in 0i64..500,
        close_delta in 0i64..100,
    ) {
        let mut ranges = Vec::new();
        for i in 0..existing_closed {
            let start = base_date() + Duration::weeks(i as i64 * 10);
            ranges.push(ArchiveRange::closed(start, start + Duration::weeks(2)));
        }

        let at = base_date() + Duration::weeks(600 + archive_week);
        let archived = archive::set_archived(&ranges, true, at).unwrap();
        prop_assert_eq!(archived.iter().filter(|r| r.is_open()).count(), 1);

        let closed = archive::set_archived(&archived, false, at + Duration::weeks(close_delta)).unwrap();
        prop_assert_eq!(closed.len(), ranges.len() + 1);
        prop_assert!(closed.iter().all(|r| !r.is_open()));
    }

    #[test]
    fn double_archive_always_rejected(
        first in 0i64..500,
        second in 0i64..500,
    ) {
        let at = base_date() + Duration::weeks(first);
        let ranges = archive::set_archived(&[], true, at).unwrap();
        let again = archive::set_archived(&ranges, true, base_date() + Duration::weeks(second));
        prop_assert!(again.is_err());
    }
}
