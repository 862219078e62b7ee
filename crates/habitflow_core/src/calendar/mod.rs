//! Pure calendar arithmetic for month/week navigation.
//!
//! # Responsibility
//! - Month lengths, month-local week numbering, week ranges and labels.
//! - Date-range expansion helpers for the aggregation layer.
//!
//! # Invariants
//! - Week numbering is month-local: week 1 always starts on day 1 of the
//!   month regardless of weekday, so a month has 4 to 6 weeks.
//! - The week ranges of weeks `1..=total_weeks` partition the month's days
//!   exactly, with no gaps and no overlaps.
//! - Every function is total for years 1970..=2100; nothing here touches
//!   clocks or rendering.

mod cursor;

pub use cursor::{CalendarCursor, WeekDay};

use crate::model::date_key::DateKey;

const MONTH_NAMES_LONG: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MONTH_NAMES_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const DAY_NAMES_LONG: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const DAY_NAMES_SHORT: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

/// Inclusive day-of-month span of one month-local week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRange {
    /// First day of month covered by the week, `>= 1`.
    pub start: u32,
    /// Last day of month covered by the week, `<= days_in_month`.
    pub end: u32,
}

/// Proleptic Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in the given month; `month0` is zero-based.
pub fn days_in_month(year: i32, month0: u32) -> u32 {
    assert!(month0 < 12, "month0 out of range: {month0}");
    match month0 {
        0 | 2 | 4 | 6 | 7 | 9 | 11 => 31,
        3 | 5 | 8 | 10 => 30,
        _ => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

/// Sunday-based weekday index of day 1 of the month.
fn first_weekday_offset(year: i32, month0: u32) -> u32 {
    // month0 is validated by every caller; day 1 exists in every month.
    DateKey::from_ymd(year, month0, 1)
        .map(|day| day.weekday_sunday0())
        .unwrap_or(0)
}

/// Month-local week number of a day, starting at 1.
pub fn week_of_month(day: DateKey) -> u32 {
    let offset = first_weekday_offset(day.year(), day.month0());
    (day.day() + offset).div_ceil(7)
}

/// Day-of-month span of week `week_num`, clamped to the month.
pub fn week_range(year: i32, month0: u32, week_num: u32) -> WeekRange {
    let offset = first_weekday_offset(year, month0);
    let last_day = days_in_month(year, month0);

    // Signed arithmetic: the nominal start of week 1 can fall before day 1.
    let nominal_start = (week_num as i64 - 1) * 7 - i64::from(offset) + 1;
    let nominal_end = nominal_start + 6;
    let start = nominal_start.max(1) as u32;
    let end = nominal_end.min(i64::from(last_day)).max(i64::from(start)) as u32;

    WeekRange { start, end }
}

/// Number of month-local weeks in the given month (4 to 6).
pub fn total_weeks(year: i32, month0: u32) -> u32 {
    let last_day = days_in_month(year, month0);
    // Day `last_day` exists by construction.
    DateKey::from_ymd(year, month0, last_day)
        .map(week_of_month)
        .unwrap_or(1)
}

/// English month label; `month0` is zero-based.
pub fn month_name(month0: u32, short: bool) -> &'static str {
    assert!(month0 < 12, "month0 out of range: {month0}");
    if short {
        MONTH_NAMES_SHORT[month0 as usize]
    } else {
        MONTH_NAMES_LONG[month0 as usize]
    }
}

/// English weekday label for a Sunday-based weekday index.
pub fn day_name(weekday_sunday0: u32, short: bool) -> &'static str {
    assert!(weekday_sunday0 < 7, "weekday out of range: {weekday_sunday0}");
    if short {
        DAY_NAMES_SHORT[weekday_sunday0 as usize]
    } else {
        DAY_NAMES_LONG[weekday_sunday0 as usize]
    }
}

/// Date keys for days `1..=max_day` of a month, in calendar order.
pub fn month_day_keys(year: i32, month0: u32, max_day: u32) -> Vec<DateKey> {
    let last = max_day.min(days_in_month(year, month0));
    (1..=last)
        .filter_map(|day| DateKey::from_ymd(year, month0, day))
        .collect()
}

/// The `count` days ending at `end` inclusive, oldest first.
///
/// The window is clipped at the epoch floor, so the result can be shorter
/// than `count` near the start of the supported range.
pub fn trailing_days(end: DateKey, count: u32) -> Vec<DateKey> {
    let mut days = Vec::with_capacity(count as usize);
    let mut day = end;
    for _ in 0..count {
        days.push(day);
        match day.pred() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    days.reverse();
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn february_respects_leap_years() {
        assert_eq!(days_in_month(2024, 1), 29);
        assert_eq!(days_in_month(2023, 1), 28);
        assert_eq!(days_in_month(2000, 1), 29);
        assert_eq!(days_in_month(2100, 1), 28);
    }

    #[test]
    fn week_of_month_counts_from_day_one() {
        // June 2024 starts on a Saturday (offset 6): day 1 is week 1,
        // day 2 already week 2.
        let first = DateKey::from_ymd(2024, 5, 1).unwrap();
        let second = DateKey::from_ymd(2024, 5, 2).unwrap();
        assert_eq!(week_of_month(first), 1);
        assert_eq!(week_of_month(second), 2);
        assert_eq!(total_weeks(2024, 5), 6);
    }

    #[test]
    fn week_ranges_partition_every_month() {
        for year in [1970, 1999, 2024, 2025, 2100] {
            for month0 in 0..12 {
                let mut expected_next = 1;
                for week in 1..=total_weeks(year, month0) {
                    let range = week_range(year, month0, week);
                    assert_eq!(range.start, expected_next, "{year}-{month0} week {week}");
                    assert!(range.end >= range.start);
                    expected_next = range.end + 1;
                }
                assert_eq!(expected_next, days_in_month(year, month0) + 1);
            }
        }
    }

    #[test]
    fn trailing_days_clip_at_epoch_floor() {
        let near_floor = DateKey::from_ymd(1970, 0, 3).unwrap();
        let days = trailing_days(near_floor, 7);
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].to_string(), "1970-01-01");
        assert_eq!(days[2].to_string(), "1970-01-03");
    }

    #[test]
    fn labels_cover_all_indices() {
        assert_eq!(month_name(0, false), "January");
        assert_eq!(month_name(11, true), "Dec");
        assert_eq!(day_name(0, true), "Su");
        assert_eq!(day_name(6, false), "Saturday");
    }
}
