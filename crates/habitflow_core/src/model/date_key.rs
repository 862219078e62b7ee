//! Canonical calendar-day key.
//!
//! # Responsibility
//! - Wrap a local calendar day behind the exact `YYYY-MM-DD` boundary format
//!   shared with persistence and presentation.
//! - Provide the day-stepping primitives the streak walk relies on.
//!
//! # Invariants
//! - Rendering is always zero-padded `YYYY-MM-DD`; parsing rejects anything
//!   else.
//! - Backward stepping never crosses the 1970-01-01 epoch floor unnoticed:
//!   `pred` returns `None` at the floor.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Earliest calendar day the core supports.
const EPOCH_FLOOR_YMD: (i32, u32, u32) = (1970, 1, 1);

/// Canonical identifier for one local calendar day.
///
/// This is the structured replacement for the ad hoc `"YYYY-MM-DD"` strings
/// the boundary contract is written in: internally everything carries a
/// `DateKey`, and the string form only appears at serialization edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(NaiveDate);

/// Parse failure for a date key string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateKeyParseError {
    input: String,
}

impl Display for DateKeyParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid date key `{}`; expected YYYY-MM-DD", self.input)
    }
}

impl Error for DateKeyParseError {}

impl DateKey {
    /// Wraps an already-resolved calendar day.
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Builds a key from a year, zero-based month and day of month.
    ///
    /// Returns `None` for out-of-range components.
    pub fn from_ymd(year: i32, month0: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month0 + 1, day).map(Self)
    }

    /// The earliest supported day, used as the streak-walk termination floor.
    pub fn epoch_floor() -> Self {
        let (year, month, day) = EPOCH_FLOOR_YMD;
        // The floor constant is a valid calendar date by definition.
        Self(NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN))
    }

    /// Today's local calendar day.
    pub fn today() -> Self {
        Self(chrono::Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Zero-based month index, `0 = January`.
    pub fn month0(&self) -> u32 {
        self.0.month0()
    }

    /// One-based day of month.
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Sunday-based weekday index, `0 = Sunday`.
    pub fn weekday_sunday0(&self) -> u32 {
        self.0.weekday().num_days_from_sunday()
    }

    /// The previous calendar day, or `None` at the epoch floor.
    pub fn pred(&self) -> Option<Self> {
        if *self <= Self::epoch_floor() {
            return None;
        }
        self.0.pred_opt().map(Self)
    }

    /// The next calendar day, or `None` at the end of the calendar.
    pub fn succ(&self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    pub fn as_date(&self) -> NaiveDate {
        self.0
    }
}

impl Display for DateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DateKey {
    type Err = DateKeyParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let parsed = NaiveDate::parse_from_str(input, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| DateKeyParseError {
                input: input.to_string(),
            })?;
        // chrono accepts unpadded numerics; only the canonical spelling
        // round-trips, everything else is rejected.
        if parsed.to_string() != input {
            return Err(DateKeyParseError {
                input: input.to_string(),
            });
        }
        Ok(parsed)
    }
}
