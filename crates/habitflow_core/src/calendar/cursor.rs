//! Week-level calendar cursor with pure carry propagation.
//!
//! # Responsibility
//! - Identify the `(year, month, week)` triple currently navigated.
//! - Advance the cursor by months or weeks without ever exposing an
//!   intermediate invalid state.
//!
//! # Invariants
//! - `week` is always within `1..=total_weeks(year, month0)` for the pair it
//!   is stored with.
//! - Navigation returns a new cursor value; callers decide when to refresh
//!   anything downstream, exactly once, after the arithmetic is done.

use super::{day_name, total_weeks, week_of_month, week_range, WeekRange};
use crate::model::date_key::DateKey;

/// Position of the currently displayed week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCursor {
    year: i32,
    month0: u32,
    week: u32,
}

/// One presentation-ready day of the cursor's week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekDay {
    /// Canonical key for the day.
    pub day: DateKey,
    /// One-based day of month.
    pub number: u32,
    /// Short weekday label (`Su`..`Sa`).
    pub name: &'static str,
    pub is_today: bool,
    pub is_future: bool,
}

impl CalendarCursor {
    /// Builds a cursor after validating the week against the month.
    pub fn at(year: i32, month0: u32, week: u32) -> Option<Self> {
        if month0 >= 12 || week < 1 || week > total_weeks(year, month0) {
            return None;
        }
        Some(Self {
            year,
            month0,
            week,
        })
    }

    /// Cursor at week 1 of the given month.
    pub fn month_start(year: i32, month0: u32) -> Self {
        assert!(month0 < 12, "month0 out of range: {month0}");
        Self {
            year,
            month0,
            week: 1,
        }
    }

    /// Cursor positioned at the week containing `day`.
    pub fn containing(day: DateKey) -> Self {
        Self {
            year: day.year(),
            month0: day.month0(),
            week: week_of_month(day),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Zero-based month index.
    pub fn month0(&self) -> u32 {
        self.month0
    }

    /// One-based month-local week number.
    pub fn week(&self) -> u32 {
        self.week
    }

    pub fn total_weeks(&self) -> u32 {
        total_weeks(self.year, self.month0)
    }

    /// Day-of-month span of the cursor's week.
    pub fn week_range(&self) -> WeekRange {
        week_range(self.year, self.month0, self.week)
    }

    /// Moves by whole months with year carry; the week resets to 1.
    pub fn advance_month(self, delta: i32) -> Self {
        let linear = i64::from(self.year) * 12 + i64::from(self.month0) + i64::from(delta);
        Self {
            year: linear.div_euclid(12) as i32,
            month0: linear.rem_euclid(12) as u32,
            week: 1,
        }
    }

    /// Moves by whole weeks, carrying across month boundaries.
    ///
    /// Stepping past the last week of a month lands on week 1 of the next
    /// month; stepping before week 1 lands on the last week of the previous
    /// month. Each loop iteration retires at least one month of the delta,
    /// so the carry terminates in O(1) steps per unit.
    pub fn advance_week(self, delta: i32) -> Self {
        let mut cursor = self;
        let mut week = i64::from(self.week) + i64::from(delta);

        loop {
            let total = i64::from(total_weeks(cursor.year, cursor.month0));
            if week > total {
                week -= total;
                cursor = cursor.advance_month(1);
            } else if week < 1 {
                cursor = cursor.advance_month(-1);
                week += i64::from(total_weeks(cursor.year, cursor.month0));
            } else {
                break;
            }
        }

        Self {
            week: week as u32,
            ..cursor
        }
    }

    /// Expands the cursor's week into presentation-ready days.
    ///
    /// `today` anchors the `is_today`/`is_future` flags so the expansion
    /// stays a pure function of its inputs.
    pub fn week_days(&self, today: DateKey) -> Vec<WeekDay> {
        let range = self.week_range();
        let mut days = Vec::with_capacity((range.end - range.start + 1) as usize);
        for number in range.start..=range.end {
            let Some(day) = DateKey::from_ymd(self.year, self.month0, number) else {
                continue;
            };
            days.push(WeekDay {
                day,
                number,
                name: day_name(day.weekday_sunday0(), true),
                is_today: day == today,
                is_future: day > today,
            });
        }
        days
    }
}
