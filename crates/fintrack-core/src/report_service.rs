//! Budget-vs-actual reporting and the recommendation rules built on it.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use fintrack_domain::{
    BudgetComparison, BudgetMonth, BudgetReport, CategoryKind, CategoryTotal, DateWindow,
    ExpenseComparison, MonthlyBudget, PeriodTotals, Recommendation, SpendingProjection,
    Transaction,
};

use crate::store::require_user;
use crate::{format, CategoryIndex, CoreError, FinanceStore, Result};

/// Tunables for recommendation generation.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// How many expense categories the ranking keeps.
    pub top_categories: usize,
    /// Category totals above this emit an advisory recommendation.
    pub large_expense_threshold: Decimal,
    /// Trailing symbol used when recommendations quote amounts.
    pub currency_symbol: String,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            top_categories: 3,
            large_expense_threshold: Decimal::from(5000),
            currency_symbol: "₽".into(),
        }
    }
}

/// Stateless reporting engine.
///
/// The store-facing entry points only fetch data; report construction
/// itself is a pure function of the fetched inputs and the injected
/// reference date, so identical inputs always produce identical reports.
pub struct ReportService;

impl ReportService {
    /// Builds the full budget report for one user and month.
    pub fn monthly_report(
        store: &dyn FinanceStore,
        user_id: Uuid,
        month: BudgetMonth,
        today: NaiveDate,
    ) -> Result<BudgetReport> {
        Self::monthly_report_with(store, user_id, month, today, &AnalysisOptions::default())
    }

    pub fn monthly_report_with(
        store: &dyn FinanceStore,
        user_id: Uuid,
        month: BudgetMonth,
        today: NaiveDate,
        options: &AnalysisOptions,
    ) -> Result<BudgetReport> {
        require_user(store, user_id)?;
        let transactions = store.transactions_in(user_id, month.window(), None)?;
        let index = CategoryIndex::build(store.categories_for(user_id)?);
        let budget = store.budget_for(user_id, month)?;
        Self::build_report(&transactions, &index, budget.as_ref(), month, today, options)
    }

    /// Pure report construction over already-fetched data.
    pub fn build_report(
        transactions: &[Transaction],
        index: &CategoryIndex,
        budget: Option<&MonthlyBudget>,
        month: BudgetMonth,
        today: NaiveDate,
        options: &AnalysisOptions,
    ) -> Result<BudgetReport> {
        let totals = Self::partition_totals(transactions, index)?;
        let symbol = options.currency_symbol.as_str();
        let mut recommendations = Vec::new();

        let comparison = budget.map(|budget| BudgetComparison {
            planned_income: budget.planned_income,
            planned_expense: budget.planned_expense,
            income_diff: totals.income - budget.planned_income,
            expense_diff: totals.expense - budget.planned_expense,
        });

        if let Some(budget) = budget {
            if budget.planned_income > Decimal::ZERO {
                let diff = totals.income - budget.planned_income;
                let percent = totals.income / budget.planned_income * Decimal::from(100);
                if diff > Decimal::ZERO {
                    recommendations.push(Recommendation::positive(format!(
                        "Income exceeded the plan by {} ({} of planned). Well done!",
                        format::format_amount(diff.abs(), symbol),
                        format::format_percent(percent),
                    )));
                } else if diff < Decimal::ZERO {
                    recommendations.push(Recommendation::warning(format!(
                        "Income is below the plan by {} ({} of planned). \
                         Consider ways to raise it.",
                        format::format_amount(diff.abs(), symbol),
                        format::format_percent(percent),
                    )));
                }
            }

            if budget.planned_expense > Decimal::ZERO {
                let diff = totals.expense - budget.planned_expense;
                let percent = totals.expense / budget.planned_expense * Decimal::from(100);
                if diff > Decimal::ZERO {
                    recommendations.push(Recommendation::warning(format!(
                        "Spending exceeded the plan by {} ({} of planned). \
                         Check the categories with the largest overruns.",
                        format::format_amount(diff.abs(), symbol),
                        format::format_percent(percent),
                    )));
                } else if diff < Decimal::ZERO {
                    recommendations.push(Recommendation::positive(format!(
                        "Spending is below the plan by {} ({} of planned). \
                         You are staying within the budget.",
                        format::format_amount(diff.abs(), symbol),
                        format::format_percent(percent),
                    )));
                }
            }
        }

        let mut projection = None;
        if let Some(budget) = budget {
            if budget.planned_expense > Decimal::ZERO && month.contains(today) {
                let projected = Self::project_month_end(totals.expense, month, today);
                if projected.projected_expense > budget.planned_expense {
                    let over = projected.projected_expense - budget.planned_expense;
                    recommendations.push(Recommendation::warning(format!(
                        "At the current pace you will exceed the monthly budget by {}",
                        format::format_amount(over, symbol),
                    )));
                } else {
                    let remaining = budget.planned_expense - projected.projected_expense;
                    recommendations.push(Recommendation::positive(format!(
                        "At the current pace you will stay within the budget, {} to spare",
                        format::format_amount(remaining, symbol),
                    )));
                }
                projection = Some(projected);
            }
        }

        let top_expenses = Self::rank_expenses(transactions, index, options.top_categories)?;
        for entry in &top_expenses {
            if entry.total > options.large_expense_threshold {
                recommendations.push(Recommendation::advice(format!(
                    "You are spending a lot on '{}': {}. Worth a closer look?",
                    entry.name,
                    format::format_amount(entry.total, symbol),
                )));
            }
        }

        if recommendations.is_empty() {
            recommendations.push(Recommendation::positive(
                "Great job! You are managing your finances well.",
            ));
        }

        Ok(BudgetReport {
            month,
            totals,
            comparison,
            projection,
            top_expenses,
            recommendations,
        })
    }

    /// Sums a transaction set into income and expense buckets by category
    /// polarity. Every transaction is counted exactly once; a category id
    /// the index cannot resolve means the row does not belong to this user.
    pub fn partition_totals(
        transactions: &[Transaction],
        index: &CategoryIndex,
    ) -> Result<PeriodTotals> {
        let mut totals = PeriodTotals::default();
        for txn in transactions {
            let category = index
                .by_id(txn.category_id)
                .ok_or_else(|| CoreError::CategoryNotFound(txn.category_id.to_string()))?;
            if category.is_income() {
                totals.income += txn.amount;
            } else {
                totals.expense += txn.amount;
            }
        }
        Ok(totals)
    }

    /// Groups expense transactions by category name, preserving first-seen
    /// order of the groups.
    pub fn group_expenses(
        transactions: &[Transaction],
        index: &CategoryIndex,
    ) -> Result<Vec<CategoryTotal>> {
        let mut groups: Vec<CategoryTotal> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for txn in transactions {
            let category = index
                .by_id(txn.category_id)
                .ok_or_else(|| CoreError::CategoryNotFound(txn.category_id.to_string()))?;
            if category.is_income() {
                continue;
            }
            match positions.get(category.name.as_str()) {
                Some(&position) => groups[position].total += txn.amount,
                None => {
                    positions.insert(category.name.clone(), groups.len());
                    groups.push(CategoryTotal {
                        name: category.name.clone(),
                        total: txn.amount,
                    });
                }
            }
        }
        Ok(groups)
    }

    /// Top expense categories by total, largest first. The sort is stable,
    /// so equal sums keep their first-seen order.
    pub fn rank_expenses(
        transactions: &[Transaction],
        index: &CategoryIndex,
        top_n: usize,
    ) -> Result<Vec<CategoryTotal>> {
        let mut groups = Self::group_expenses(transactions, index)?;
        groups.sort_by(|a, b| b.total.cmp(&a.total));
        groups.truncate(top_n);
        Ok(groups)
    }

    /// Income/expense totals for an arbitrary window.
    pub fn totals_in(
        store: &dyn FinanceStore,
        user_id: Uuid,
        window: DateWindow,
    ) -> Result<PeriodTotals> {
        let transactions = store.transactions_in(user_id, window, None)?;
        let index = CategoryIndex::build(store.categories_for(user_id)?);
        Self::partition_totals(&transactions, &index)
    }

    /// Totals for a single day.
    pub fn today_report(
        store: &dyn FinanceStore,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<PeriodTotals> {
        require_user(store, user_id)?;
        Self::totals_in(store, user_id, DateWindow::single_day(today))
    }

    /// Totals for the trailing seven days, today inclusive.
    pub fn week_report(
        store: &dyn FinanceStore,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<PeriodTotals> {
        require_user(store, user_id)?;
        Self::totals_in(store, user_id, DateWindow::trailing(7, today))
    }

    /// Expense lines grouped by category for detailed reports.
    pub fn expenses_by_category(
        store: &dyn FinanceStore,
        user_id: Uuid,
        window: DateWindow,
    ) -> Result<Vec<CategoryTotal>> {
        require_user(store, user_id)?;
        let transactions =
            store.transactions_in(user_id, window, Some(CategoryKind::Expense))?;
        let index = CategoryIndex::build(store.categories_for(user_id)?);
        Self::group_expenses(&transactions, &index)
    }

    /// Expense sums for two windows, e.g. this week against the previous one.
    pub fn compare_expense_windows(
        store: &dyn FinanceStore,
        user_id: Uuid,
        current: DateWindow,
        previous: DateWindow,
    ) -> Result<ExpenseComparison> {
        require_user(store, user_id)?;
        Ok(ExpenseComparison {
            current: Self::expense_sum(store, user_id, current)?,
            previous: Self::expense_sum(store, user_id, previous)?,
        })
    }

    fn expense_sum(
        store: &dyn FinanceStore,
        user_id: Uuid,
        window: DateWindow,
    ) -> Result<Decimal> {
        let transactions =
            store.transactions_in(user_id, window, Some(CategoryKind::Expense))?;
        Ok(transactions.iter().map(|txn| txn.amount).sum())
    }

    fn project_month_end(
        total_expense: Decimal,
        month: BudgetMonth,
        today: NaiveDate,
    ) -> SpendingProjection {
        let days_passed = ((today - month.first_day()).num_days() + 1).max(1) as u32;
        let days_in_month = month.days();
        let daily_expense = total_expense / Decimal::from(days_passed);
        let days_remaining = days_in_month.saturating_sub(days_passed);
        SpendingProjection {
            days_passed,
            days_in_month,
            daily_expense,
            projected_expense: total_expense + daily_expense * Decimal::from(days_remaining),
        }
    }
}
