//! Monthly budget rows and the calendar-month value type they key on.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{de::Deserializer, ser::Serializer, Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;
use crate::window::DateWindow;

/// A calendar month, rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BudgetMonth {
    year: i32,
    month: u32,
}

impl BudgetMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        // Reject years NaiveDate cannot represent so first_day() stays total.
        NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self { year, month })
    }

    /// The month containing the given date.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Calendar length of the month in days, derived directly from the
    /// distance to the next month's first day.
    pub fn days(&self) -> u32 {
        (self.next().first_day() - self.first_day()).num_days() as u32
    }

    /// Half-open window covering the whole month.
    pub fn window(&self) -> DateWindow {
        DateWindow {
            start: self.first_day(),
            end: self.next().first_day(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.window().contains(date)
    }
}

impl fmt::Display for BudgetMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Error raised when a `YYYY-MM` month string cannot be parsed.
pub struct MonthParseError {
    pub input: String,
}

impl fmt::Display for MonthParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid month `{}`, expected YYYY-MM", self.input)
    }
}

impl std::error::Error for MonthParseError {}

impl FromStr for BudgetMonth {
    type Err = MonthParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let err = || MonthParseError {
            input: value.to_string(),
        };
        let (year, month) = value.trim().split_once('-').ok_or_else(err)?;
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        BudgetMonth::new(year, month).ok_or_else(err)
    }
}

impl Serialize for BudgetMonth {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BudgetMonth {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Planned income and expense for one user and one month.
///
/// Unique per `(user_id, month)`. Created lazily on first access and never
/// deleted automatically. Plans are non-negative; validation happens at the
/// input boundary, not here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyBudget {
    pub id: Uuid,
    pub user_id: Uuid,
    pub month: BudgetMonth,
    pub planned_income: Decimal,
    pub planned_expense: Decimal,
}

impl MonthlyBudget {
    pub fn new(user_id: Uuid, month: BudgetMonth) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            month,
            planned_income: Decimal::ZERO,
            planned_expense: Decimal::ZERO,
        }
    }
}

impl Identifiable for MonthlyBudget {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl OwnedByUser for MonthlyBudget {
    fn user_id(&self) -> Uuid {
        self.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_length_is_calendar_exact() {
        assert_eq!(BudgetMonth::new(2025, 4).unwrap().days(), 30);
        assert_eq!(BudgetMonth::new(2025, 1).unwrap().days(), 31);
        assert_eq!(BudgetMonth::new(2024, 2).unwrap().days(), 29);
        assert_eq!(BudgetMonth::new(2025, 2).unwrap().days(), 28);
    }

    #[test]
    fn december_length_spans_year_boundary() {
        let december = BudgetMonth::new(2025, 12).unwrap();
        assert_eq!(december.days(), 31);
        assert_eq!(december.next(), BudgetMonth::new(2026, 1).unwrap());
        assert_eq!(december.window().end, date(2026, 1, 1));
    }

    #[test]
    fn january_previous_rolls_back_a_year() {
        let january = BudgetMonth::new(2025, 1).unwrap();
        assert_eq!(january.previous(), BudgetMonth::new(2024, 12).unwrap());
    }

    #[test]
    fn window_contains_only_days_of_the_month() {
        let month = BudgetMonth::new(2025, 6).unwrap();
        assert!(month.contains(date(2025, 6, 1)));
        assert!(month.contains(date(2025, 6, 30)));
        assert!(!month.contains(date(2025, 7, 1)));
        assert!(!month.contains(date(2025, 5, 31)));
    }

    #[test]
    fn parses_and_renders_year_month() {
        let month: BudgetMonth = "2025-08".parse().expect("valid month");
        assert_eq!(month, BudgetMonth::new(2025, 8).unwrap());
        assert_eq!(month.to_string(), "2025-08");

        assert!("2025-13".parse::<BudgetMonth>().is_err());
        assert!("2025".parse::<BudgetMonth>().is_err());
        assert!("08-2025x".parse::<BudgetMonth>().is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let month = BudgetMonth::new(2025, 8).unwrap();
        let json = serde_json::to_string(&month).unwrap();
        assert_eq!(json, "\"2025-08\"");
        let back: BudgetMonth = serde_json::from_str(&json).unwrap();
        assert_eq!(back, month);
    }
}
