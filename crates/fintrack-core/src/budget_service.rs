//! Get-or-create and plan updates for monthly budget rows.

use rust_decimal::Decimal;
use uuid::Uuid;

use fintrack_domain::{BudgetMonth, MonthlyBudget};

use crate::store::require_user;
use crate::{CoreError, FinanceStore, Result};

/// Provides validated operations for [`MonthlyBudget`] rows.
pub struct BudgetService;

impl BudgetService {
    /// Parses a planned figure. Unlike transaction amounts, zero is a valid
    /// plan; only negatives and non-numbers are rejected.
    pub fn parse_plan(raw: &str) -> Result<Decimal> {
        use std::str::FromStr;
        let plan = Decimal::from_str(raw.trim())
            .map_err(|_| CoreError::InvalidAmount(format!("`{}` is not a number", raw.trim())))?;
        if plan < Decimal::ZERO {
            return Err(CoreError::InvalidAmount(
                "planned amounts must not be negative".into(),
            ));
        }
        Ok(plan)
    }

    /// Returns the budget row for `(user, month)`, creating an all-zero row
    /// on first access. Rows are never deleted automatically.
    pub fn get_or_create(
        store: &dyn FinanceStore,
        user_id: Uuid,
        month: BudgetMonth,
    ) -> Result<MonthlyBudget> {
        require_user(store, user_id)?;
        if let Some(existing) = store.budget_for(user_id, month)? {
            return Ok(existing);
        }
        let budget = MonthlyBudget::new(user_id, month);
        store.upsert_budget(budget.clone())?;
        Ok(budget)
    }

    /// Replaces the planned figures for the month. Negative plans are
    /// rejected here, at the input boundary.
    pub fn set_plan(
        store: &dyn FinanceStore,
        user_id: Uuid,
        month: BudgetMonth,
        planned_income: Decimal,
        planned_expense: Decimal,
    ) -> Result<MonthlyBudget> {
        if planned_income < Decimal::ZERO || planned_expense < Decimal::ZERO {
            return Err(CoreError::InvalidAmount(
                "planned amounts must not be negative".into(),
            ));
        }
        let mut budget = Self::get_or_create(store, user_id, month)?;
        budget.planned_income = planned_income;
        budget.planned_expense = planned_expense;
        store.upsert_budget(budget.clone())?;
        Ok(budget)
    }
}
