//! Archive-range mutation
//!
//! A habit's visibility dimension is a two-state machine: Active and
//! Archived. Archiving appends an open range anchored at the acting week;
//! un-archiving closes that open range at the acting week. The invariant is
//! that at most one range is open at a time, and this module refuses to
//! repair a store that already violates it.

use crate::error::{HebdomadError, Result};
use crate::types::ArchiveRange;
use chrono::NaiveDate;

/// Apply an archive or un-archive transition, returning the full new range
/// sequence. The result replaces the stored value wholesale; nothing is
/// merged server-side.
///
/// `target_week_start` must be a canonical week-start (Monday).
///
/// Archiving with an open range already present, or un-archiving with more
/// than one open range, is an [`InvariantViolation`](HebdomadError): the
/// mutator never guesses which range was meant. Un-archiving with no open
/// range is a no-op. Un-archiving at a week before the open range's start
/// would produce an inverted range and is rejected as a validation error.
pub fn set_archived(
    ranges: &[ArchiveRange],
    archived: bool,
    target_week_start: NaiveDate,
) -> Result<Vec<ArchiveRange>> {
    let open_count = ranges.iter().filter(|r| r.is_open()).count();

    if archived {
        if open_count > 0 {
            return Err(HebdomadError::InvariantViolation(format!(
                "cannot archive: {} open archive range(s) already present",
                open_count
            )));
        }

        let mut out = ranges.to_vec();
        out.push(ArchiveRange::open(target_week_start));
        return Ok(out);
    }

    // Un-archive path
    match open_count {
        0 => Ok(ranges.to_vec()),
        1 => {
            let open_start = ranges
                .iter()
                .find(|r| r.is_open())
                .map(|r| r.start)
                .unwrap_or(target_week_start);

            if target_week_start < open_start {
                return Err(HebdomadError::Validation(format!(
                    "cannot close archive range starting {} at earlier week {}",
                    open_start, target_week_start
                )));
            }

            Ok(ranges
                .iter()
                .map(|r| {
                    if r.is_open() {
                        ArchiveRange::closed(r.start, target_week_start)
                    } else {
                        *r
                    }
                })
                .collect())
        }
        n => Err(HebdomadError::InvariantViolation(format!(
            "{} open archive ranges; refusing to pick one to close",
            n
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_archive_appends_open_range() {
        let ranges = vec![ArchiveRange::closed(date(2024, 1, 8), date(2024, 1, 22))];
        let out = set_archived(&ranges, true, date(2024, 3, 4)).unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out[0], ranges[0]);
        assert_eq!(out[1], ArchiveRange::open(date(2024, 3, 4)));
    }

    #[test]
    fn test_archive_rejects_second_open_range() {
        let ranges = vec![ArchiveRange::open(date(2024, 1, 8))];
        let err = set_archived(&ranges, true, date(2024, 3, 4)).unwrap_err();
        assert!(matches!(err, HebdomadError::InvariantViolation(_)));
    }

    #[test]
    fn test_unarchive_closes_the_open_range() {
        let ranges = vec![
            ArchiveRange::closed(date(2023, 11, 6), date(2023, 11, 20)),
            ArchiveRange::open(date(2024, 1, 8)),
        ];
        let out = set_archived(&ranges, false, date(2024, 2, 12)).unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out[0], ranges[0]);
        assert_eq!(out[1], ArchiveRange::closed(date(2024, 1, 8), date(2024, 2, 12)));
    }

    #[test]
    fn test_unarchive_without_open_range_is_noop() {
        let ranges = vec![ArchiveRange::closed(date(2024, 1, 8), date(2024, 1, 22))];
        let out = set_archived(&ranges, false, date(2024, 3, 4)).unwrap();
        assert_eq!(out, ranges);
    }

    #[test]
    fn test_unarchive_same_week_yields_one_week_range() {
        // Archive and un-archive within the same viewed week: the range
        // covers exactly that week
        let ranges = set_archived(&[], true, date(2024, 1, 8)).unwrap();
        let out = set_archived(&ranges, false, date(2024, 1, 8)).unwrap();
        assert_eq!(out, vec![ArchiveRange::closed(date(2024, 1, 8), date(2024, 1, 8))]);
    }

    #[test]
    fn test_unarchive_before_start_is_rejected() {
        let ranges = vec![ArchiveRange::open(date(2024, 2, 5))];
        let err = set_archived(&ranges, false, date(2024, 1, 8)).unwrap_err();
        assert!(matches!(err, HebdomadError::Validation(_)));
    }

    #[test]
    fn test_unarchive_with_two_open_ranges_is_rejected() {
        let ranges = vec![
            ArchiveRange::open(date(2024, 1, 8)),
            ArchiveRange::open(date(2024, 2, 5)),
        ];
        let err = set_archived(&ranges, false, date(2024, 3, 4)).unwrap_err();
        assert!(matches!(err, HebdomadError::InvariantViolation(_)));
    }

    #[test]
    fn test_round_trip_adds_exactly_one_closed_range() {
        let before = vec![ArchiveRange::closed(date(2023, 11, 6), date(2023, 11, 20))];
        let archived = set_archived(&before, true, date(2024, 1, 8)).unwrap();
        let after = set_archived(&archived, false, date(2024, 1, 29)).unwrap();

        assert_eq!(after.len(), before.len() + 1);
        assert!(after.iter().all(|r| !r.is_open()));
    }
}
