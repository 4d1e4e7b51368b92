//! Engine output types. None of these are persisted.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::budget::BudgetMonth;

/// Income and expense sums over some date window.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeriodTotals {
    pub income: Decimal,
    pub expense: Decimal,
}

impl PeriodTotals {
    pub fn balance(&self) -> Decimal {
        self.income - self.expense
    }
}

/// One category's summed expenses, used for ranking and detailed reports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryTotal {
    pub name: String,
    pub total: Decimal,
}

/// Actual totals measured against the month's plan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BudgetComparison {
    pub planned_income: Decimal,
    pub planned_expense: Decimal,
    /// `actual - planned`; positive means income above plan.
    pub income_diff: Decimal,
    /// `actual - planned`; positive means spending above plan.
    pub expense_diff: Decimal,
}

/// Linear extrapolation of month-end spending from the pace so far.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpendingProjection {
    pub days_passed: u32,
    pub days_in_month: u32,
    pub daily_expense: Decimal,
    pub projected_expense: Decimal,
}

/// Expense sums for two adjacent windows of equal length.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpenseComparison {
    pub current: Decimal,
    pub previous: Decimal,
}

impl ExpenseComparison {
    /// Positive when the current window cost more than the previous one.
    pub fn diff(&self) -> Decimal {
        self.current - self.previous
    }
}

/// Tone of a recommendation, used by renderers to pick a marker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RecommendationKind {
    Positive,
    Warning,
    Advice,
}

impl RecommendationKind {
    pub fn marker(self) -> &'static str {
        match self {
            RecommendationKind::Positive => "✅",
            RecommendationKind::Warning => "⚠️",
            RecommendationKind::Advice => "💡",
        }
    }
}

/// A single human-readable recommendation line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub message: String,
}

impl Recommendation {
    pub fn positive(message: impl Into<String>) -> Self {
        Self {
            kind: RecommendationKind::Positive,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: RecommendationKind::Warning,
            message: message.into(),
        }
    }

    pub fn advice(message: impl Into<String>) -> Self {
        Self {
            kind: RecommendationKind::Advice,
            message: message.into(),
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.marker(), self.message)
    }
}

/// The complete budget-vs-actual report for one user and one month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetReport {
    pub month: BudgetMonth,
    pub totals: PeriodTotals,
    /// Absent when no budget row exists for the month.
    pub comparison: Option<BudgetComparison>,
    /// Absent when no budget row exists, the plan is zero, or the reference
    /// date falls outside the month.
    pub projection: Option<SpendingProjection>,
    /// Top expense categories, largest first; ties keep first-seen order.
    pub top_expenses: Vec<CategoryTotal>,
    pub recommendations: Vec<Recommendation>,
}

impl BudgetReport {
    pub fn total_income(&self) -> Decimal {
        self.totals.income
    }

    pub fn total_expense(&self) -> Decimal {
        self.totals.expense
    }
}
