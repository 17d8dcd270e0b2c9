//! Temporal intervals and calendar-period partitioning
//!
//! Partitions a date range into consecutive calendar periods (daily,
//! weekly, monthly, quarterly, yearly) used to group an image series
//! for per-interval reduction.

use crate::error::{Error, Result};
use chrono::{Datelike, Duration, Months, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// A closed date interval, inclusive at both ends.
///
/// When `start == end` the interval selects exact-date matches.
/// Invariant: `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Interval {
    /// Create an interval, validating `start <= end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Whether a date falls within the interval (inclusive at both ends)
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Day span from start to end
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Temporal midpoint: start plus half the day span.
    ///
    /// Odd spans floor to the earlier of the two central dates, keeping
    /// the result at date resolution.
    pub fn midpoint(&self) -> NaiveDate {
        self.start + Duration::days(self.num_days() / 2)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Calendar frequency for partitioning a date range into periods
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodFrequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl FromStr for PeriodFrequency {
    type Err = Error;

    /// Accepts pandas-style period codes (`D`, `W`, `M`, `Q`, `Y`/`A`)
    /// as well as long names.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "d" | "day" | "daily" => Ok(Self::Daily),
            "w" | "week" | "weekly" => Ok(Self::Weekly),
            "m" | "month" | "monthly" => Ok(Self::Monthly),
            "q" | "quarter" | "quarterly" => Ok(Self::Quarterly),
            "y" | "a" | "year" | "yearly" | "annual" => Ok(Self::Yearly),
            other => Err(Error::UnknownFrequency(other.to_string())),
        }
    }
}

impl PeriodFrequency {
    /// First day of the period containing `date`
    fn period_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Daily => date,
            Self::Weekly => {
                date - Duration::days(date.weekday().num_days_from_monday() as i64)
            }
            Self::Monthly => date.with_day(1).unwrap(),
            Self::Quarterly => {
                let month = (date.month0() / 3) * 3 + 1;
                NaiveDate::from_ymd_opt(date.year(), month, 1).unwrap()
            }
            Self::Yearly => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap(),
        }
    }

    /// First day of the period following the one starting at `period_start`
    fn next_period_start(&self, period_start: NaiveDate) -> NaiveDate {
        match self {
            Self::Daily => period_start + Duration::days(1),
            Self::Weekly => period_start + Duration::days(7),
            Self::Monthly => period_start + Months::new(1),
            Self::Quarterly => period_start + Months::new(3),
            Self::Yearly => period_start + Months::new(12),
        }
    }
}

/// Partition `[start, end]` into consecutive, non-overlapping calendar
/// periods at the given frequency.
///
/// Each interval starts on its period's first day and ends on the period's
/// last day; the final partial period is truncated to `end`. Intervals are
/// returned in chronological order and their union covers `[start, end]`.
///
/// # Errors
/// `Error::InvalidRange` when `start > end`.
pub fn generate_intervals(
    start: NaiveDate,
    end: NaiveDate,
    freq: PeriodFrequency,
) -> Result<Vec<Interval>> {
    if start > end {
        return Err(Error::InvalidRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    let mut intervals = Vec::new();
    let mut cursor = freq.period_start(start);

    while cursor <= end {
        let next = freq.next_period_start(cursor);
        let period_end = next - Duration::days(1);
        intervals.push(Interval {
            start: cursor,
            end: period_end.min(end),
        });
        cursor = next;
    }

    Ok(intervals)
}
