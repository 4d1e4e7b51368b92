//! Half-open date ranges used by every aggregation filter.

use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// A half-open date range `[start, end)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateWindowError> {
        if end <= start {
            return Err(DateWindowError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// The window covering a single calendar day.
    pub fn single_day(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day + Duration::days(1),
        }
    }

    /// The trailing window ending with `today` inclusive, reaching `days`
    /// days back.
    pub fn trailing(days: u32, today: NaiveDate) -> Self {
        Self {
            start: today - Duration::days(days as i64),
            end: today + Duration::days(1),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    /// Number of days covered by the window.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Errors that can occur when constructing [`DateWindow`] values.
pub enum DateWindowError {
    InvalidRange,
}

impl fmt::Display for DateWindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateWindowError::InvalidRange => f.write_str("date window end must be after start"),
        }
    }
}

impl std::error::Error for DateWindowError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn single_day_covers_exactly_one_date() {
        let window = DateWindow::single_day(date(2025, 8, 7));
        assert!(window.contains(date(2025, 8, 7)));
        assert!(!window.contains(date(2025, 8, 8)));
        assert_eq!(window.num_days(), 1);
    }

    #[test]
    fn trailing_week_includes_today_and_seven_days_back() {
        let window = DateWindow::trailing(7, date(2025, 8, 7));
        assert!(window.contains(date(2025, 7, 31)));
        assert!(window.contains(date(2025, 8, 7)));
        assert!(!window.contains(date(2025, 7, 30)));
        assert!(!window.contains(date(2025, 8, 8)));
    }

    #[test]
    fn rejects_inverted_ranges() {
        let err = DateWindow::new(date(2025, 8, 7), date(2025, 8, 7));
        assert_eq!(err, Err(DateWindowError::InvalidRange));
    }
}
