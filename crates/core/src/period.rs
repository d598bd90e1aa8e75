//! Query windows for range lookups
//!
//! A window starts at an instant `t` and ends one period later. Both ends are
//! inclusive, and the end is inclusive at calendar-day granularity: every
//! record stamped on the day of `t + period`, up to and including that day's
//! last instant, is inside the window. A weekly query issued for midnight of
//! the 10th therefore still sees a record at 10:00 on the 17th. Callers rely
//! on this, so it must not be narrowed to a half-open interval.
//!
//! Month arithmetic normalizes instead of clamping: adding one month to
//! January 31st yields the 31st day counted from February 1st, which lands in
//! early March.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a range-query window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// From `t` through the end of the following calendar day
    ///
    /// A query at midnight therefore spans two whole calendar days.
    Day,
    /// From `t` through the end of the calendar day seven days later
    Week,
    /// From `t` through the end of the calendar day one month later
    Month,
}

impl Period {
    /// All periods, shortest first
    pub const ALL: [Period; 3] = [Period::Day, Period::Week, Period::Month];

    /// Inclusive end of the window starting at `start`
    ///
    /// Returns `None` when the end lies beyond the representable date range;
    /// the window is then open-ended.
    pub fn window_end(self, start: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            Period::Day => start.checked_add_days(Days::new(1)),
            Period::Week => start.checked_add_days(Days::new(7)),
            Period::Month => add_one_month(start),
        }
    }

    /// Last calendar day covered by the window starting at `start`
    pub fn last_day(self, start: NaiveDateTime) -> Option<NaiveDate> {
        self.window_end(start).map(|end| end.date())
    }

    /// Whether `when` falls inside the window starting at `start`
    pub fn contains(self, start: NaiveDateTime, when: NaiveDateTime) -> bool {
        if when < start {
            return false;
        }
        match self.last_day(start) {
            Some(last) => when.date() <= last,
            None => true,
        }
    }

    /// Lowercase name, as used in configuration and logs
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn add_one_month(start: NaiveDateTime) -> Option<NaiveDateTime> {
    let date = start.date();
    let (year, month) = if date.month() == 12 {
        (date.year().checked_add(1)?, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let target = first.checked_add_days(Days::new(u64::from(date.day() - 1)))?;
    Some(target.and_time(start.time()))
}
