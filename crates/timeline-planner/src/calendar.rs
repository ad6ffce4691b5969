//! Week-granular calendar index.
//!
//! The planning window is a contiguous run of month buckets, each split into
//! four or five weeks. Every week in the window gets a zero-based linear
//! position, which is what task spans and milestones are laid out against.

use crate::models::WeekCoord;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Months that are laid out with five weeks. All others get four.
///
/// This is a fixed approximation, not derived from days-in-month.
pub const LONG_MONTHS: [u32; 7] = [1, 3, 5, 7, 8, 10, 12];

/// Longest planning window, in months.
pub const MAX_WINDOW_MONTHS: i64 = 100 * 12;

/// Number of week slots a month occupies on the timeline.
pub fn weeks_in_month(month: u32) -> u32 {
    if LONG_MONTHS.contains(&month) {
        5
    } else {
        4
    }
}

/// One month-year unit of the planning window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarBucket {
    pub month: u32,
    pub year: i32,
    pub weeks: u32,
    pub label: String,
}

impl CalendarBucket {
    fn new(month: u32, year: i32) -> Self {
        let label = NaiveDate::from_ymd_opt(year, month, 1)
            .map(|d| d.format("%b %Y").to_string())
            .unwrap_or_else(|| format!("{month:02}/{year}"));
        Self {
            month,
            year,
            weeks: weeks_in_month(month),
            label,
        }
    }

    pub fn matches(&self, month: u32, year: i32) -> bool {
        self.month == month && self.year == year
    }
}

/// A single week column of the timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekSlot {
    pub position: i64,
    pub coord: WeekCoord,
    /// Label of the owning bucket.
    pub label: String,
}

/// Ordered month buckets spanning the planning window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Calendar {
    buckets: Vec<CalendarBucket>,
}

impl Calendar {
    /// Build the buckets from `start` through `end`, inclusive.
    ///
    /// An inverted window, a month number outside 1-12, a year chrono cannot
    /// represent, or a window longer than [`MAX_WINDOW_MONTHS`] yields an
    /// empty calendar.
    pub fn build(start_month: u32, start_year: i32, end_month: u32, end_year: i32) -> Self {
        let valid_month = |m: u32| (1..=12).contains(&m);
        let valid_year = |y: i32| (NaiveDate::MIN.year()..=NaiveDate::MAX.year()).contains(&y);
        if !valid_month(start_month)
            || !valid_month(end_month)
            || !valid_year(start_year)
            || !valid_year(end_year)
        {
            return Self::default();
        }

        let first = i64::from(start_year) * 12 + i64::from(start_month) - 1;
        let last = i64::from(end_year) * 12 + i64::from(end_month) - 1;
        if first > last || last - first >= MAX_WINDOW_MONTHS {
            return Self::default();
        }

        let buckets = (first..=last)
            .map(|index| {
                let year = index.div_euclid(12) as i32;
                let month = index.rem_euclid(12) as u32 + 1;
                CalendarBucket::new(month, year)
            })
            .collect();

        Self { buckets }
    }

    pub fn buckets(&self) -> &[CalendarBucket] {
        &self.buckets
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Total number of week slots in the window.
    pub fn total_weeks(&self) -> u32 {
        self.buckets.iter().map(|b| b.weeks).sum()
    }

    pub fn bucket(&self, month: u32, year: i32) -> Option<&CalendarBucket> {
        self.buckets.iter().find(|b| b.matches(month, year))
    }

    /// Linear position of `(month, week, year)`.
    ///
    /// Sums the week counts of all buckets before the matching one and adds
    /// `week - 1`. A coordinate outside the window resolves to the total week
    /// count, i.e. one past the last slot.
    pub fn week_position(&self, coord: WeekCoord) -> i64 {
        let mut position: i64 = 0;
        for bucket in &self.buckets {
            if bucket.matches(coord.month, coord.year) {
                return position + i64::from(coord.week) - 1;
            }
            position += i64::from(bucket.weeks);
        }
        position
    }

    /// Every week column in order, positions 0..total_weeks.
    pub fn week_slots(&self) -> Vec<WeekSlot> {
        let mut slots = Vec::with_capacity(self.total_weeks() as usize);
        let mut position = 0;
        for bucket in &self.buckets {
            for week in 1..=bucket.weeks {
                slots.push(WeekSlot {
                    position,
                    coord: WeekCoord::new(bucket.month, week, bucket.year),
                    label: bucket.label.clone(),
                });
                position += 1;
            }
        }
        slots
    }

    /// Map a calendar date onto the week grid.
    ///
    /// Week of month is `(day - 1) / 7 + 1`, capped at the bucket's week
    /// count. Dates outside the window have no coordinate.
    pub fn coord_for_date(&self, date: NaiveDate) -> Option<WeekCoord> {
        let bucket = self.bucket(date.month(), date.year())?;
        let week = ((date.day() - 1) / 7 + 1).min(bucket.weeks);
        Some(WeekCoord::new(bucket.month, week, bucket.year))
    }

    pub fn position_for_date(&self, date: NaiveDate) -> Option<i64> {
        self.coord_for_date(date).map(|coord| self.week_position(coord))
    }
}

/// Build the calendar for a start/end month-year window.
pub fn build_calendar(
    start_month: u32,
    start_year: i32,
    end_month: u32,
    end_year: i32,
) -> Calendar {
    Calendar::build(start_month, start_year, end_month, end_year)
}

/// Linear week position of `(month, week, year)` within `calendar`.
pub fn week_position(calendar: &Calendar, month: u32, week: u32, year: i32) -> i64 {
    calendar.week_position(WeekCoord::new(month, week, year))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn window() -> Calendar {
        build_calendar(10, 2024, 12, 2025)
    }

    #[test]
    fn test_long_month_rule() {
        let long: Vec<u32> = (1..=12).filter(|m| weeks_in_month(*m) == 5).collect();
        assert_eq!(long, vec![1, 3, 5, 7, 8, 10, 12]);
        assert_eq!(weeks_in_month(2), 4);
    }

    #[test]
    fn test_build_calendar_spans_years() {
        let calendar = window();
        assert_eq!(calendar.len(), 15);

        let first = &calendar.buckets()[0];
        assert_eq!((first.month, first.year, first.weeks), (10, 2024, 5));
        assert_eq!(first.label, "Oct 2024");

        let last = calendar.buckets().last().unwrap();
        assert_eq!((last.month, last.year), (12, 2025));
        assert_eq!(last.label, "Dec 2025");
    }

    #[test]
    fn test_inverted_window_is_empty() {
        assert!(build_calendar(3, 2025, 2, 2025).is_empty());
        assert!(build_calendar(1, 2026, 12, 2025).is_empty());
        assert!(build_calendar(13, 2025, 2, 2026).is_empty());
    }

    #[test]
    fn test_extreme_years_are_empty() {
        assert!(build_calendar(12, i32::MAX, 12, i32::MAX).is_empty());
        assert!(build_calendar(1, i32::MIN, 1, i32::MIN).is_empty());
        assert!(build_calendar(1, -200_000, 12, 2025).is_empty());
    }

    #[test]
    fn test_window_length_limit() {
        let calendar = build_calendar(1, 2000, 12, 2099);
        assert_eq!(calendar.len() as i64, MAX_WINDOW_MONTHS);
        assert!(build_calendar(1, 2000, 1, 2100).is_empty());
    }

    #[test]
    fn test_negative_years_stay_in_order() {
        let calendar = build_calendar(11, -1, 2, 0);
        let months: Vec<(i32, u32)> = calendar
            .buckets()
            .iter()
            .map(|b| (b.year, b.month))
            .collect();
        assert_eq!(months, vec![(-1, 11), (-1, 12), (0, 1), (0, 2)]);
    }

    #[test]
    fn test_single_month_window() {
        let calendar = build_calendar(2, 2025, 2, 2025);
        assert_eq!(calendar.len(), 1);
        assert_eq!(calendar.total_weeks(), 4);
    }

    #[test]
    fn test_first_week_is_zero() {
        assert_eq!(week_position(&window(), 10, 1, 2024), 0);
    }

    #[test]
    fn test_week_position_accumulates() {
        let calendar = window();
        // Oct (5) + Nov (4) precede December.
        assert_eq!(week_position(&calendar, 12, 1, 2024), 9);
        // Oct (5) + Nov (4) + Dec (5) precede January.
        assert_eq!(week_position(&calendar, 1, 3, 2025), 16);
    }

    #[test]
    fn test_out_of_window_clamps_past_end() {
        let calendar = window();
        let total = i64::from(calendar.total_weeks());
        assert_eq!(week_position(&calendar, 6, 2, 2030), total);
        assert_eq!(week_position(&calendar, 9, 1, 2024), total);
        assert_eq!(week_position(&Calendar::default(), 1, 1, 2025), 0);
    }

    #[test]
    fn test_week_slots_match_positions() {
        let calendar = window();
        let slots = calendar.week_slots();
        assert_eq!(slots.len() as u32, calendar.total_weeks());
        for slot in &slots {
            assert_eq!(calendar.week_position(slot.coord), slot.position);
        }
    }

    #[test]
    fn test_coord_for_date() {
        let calendar = window();
        let coord = calendar.coord_for_date(NaiveDate::from_ymd_opt(2025, 2, 15).unwrap());
        assert_eq!(coord, Some(WeekCoord::new(2, 3, 2025)));

        // Day 29+ of a four-week month folds into week 4.
        let coord = calendar.coord_for_date(NaiveDate::from_ymd_opt(2025, 4, 30).unwrap());
        assert_eq!(coord, Some(WeekCoord::new(4, 4, 2025)));

        assert!(calendar.coord_for_date(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()).is_none());
    }

    proptest! {
        #[test]
        fn prop_buckets_contiguous(
            start_year in 1990i32..2100,
            start_month in 1u32..=12,
            span in 0u32..60,
        ) {
            let end_index = start_month - 1 + span;
            let end_year = start_year + (end_index / 12) as i32;
            let end_month = end_index % 12 + 1;
            let calendar = build_calendar(start_month, start_year, end_month, end_year);

            prop_assert_eq!(calendar.len() as u32, span + 1);
            for pair in calendar.buckets().windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                let expected = if a.month == 12 { (a.year + 1, 1) } else { (a.year, a.month + 1) };
                prop_assert_eq!((b.year, b.month), expected);
            }
        }

        #[test]
        fn prop_positions_strictly_increase(
            start_year in 1990i32..2100,
            start_month in 1u32..=12,
            span in 0u32..36,
        ) {
            let end_index = start_month - 1 + span;
            let calendar = build_calendar(
                start_month,
                start_year,
                end_index % 12 + 1,
                start_year + (end_index / 12) as i32,
            );

            let positions: Vec<i64> = calendar
                .week_slots()
                .iter()
                .map(|slot| calendar.week_position(slot.coord))
                .collect();
            prop_assert_eq!(positions[0], 0);
            for pair in positions.windows(2) {
                prop_assert_eq!(pair[1], pair[0] + 1);
            }
        }
    }
}
