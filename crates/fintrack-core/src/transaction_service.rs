//! Validated creation of transactions.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use fintrack_domain::{Category, Transaction};

use crate::store::require_user;
use crate::{CategoryIndex, CoreError, FinanceStore, Result};

/// Input-boundary operations for [`Transaction`] rows.
pub struct TransactionService;

impl TransactionService {
    /// Parses a user-supplied amount. Rejections happen here, at the
    /// boundary; the engine itself never sees bad amounts.
    pub fn parse_amount(raw: &str) -> Result<Decimal> {
        let amount = Decimal::from_str(raw.trim())
            .map_err(|_| CoreError::InvalidAmount(format!("`{}` is not a number", raw.trim())))?;
        Self::validate_amount(amount)?;
        Ok(amount)
    }

    pub fn validate_amount(amount: Decimal) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(CoreError::InvalidAmount(
                "amount must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Records an operation under a category resolved by name, ignoring
    /// case. Returns the stored row and the resolved category so callers
    /// can echo the canonical name.
    pub fn record(
        store: &dyn FinanceStore,
        user_id: Uuid,
        amount: Decimal,
        date: NaiveDate,
        category_name: &str,
        description: &str,
    ) -> Result<(Transaction, Category)> {
        require_user(store, user_id)?;
        Self::validate_amount(amount)?;
        let index = CategoryIndex::build(store.categories_for(user_id)?);
        let category = index
            .by_name(category_name)
            .ok_or_else(|| CoreError::CategoryNotFound(category_name.trim().to_string()))?
            .clone();
        let transaction = Transaction::new(user_id, amount, date, category.id, description);
        store.add_transaction(transaction.clone())?;
        Ok((transaction, category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_accepts_decimal_strings() {
        assert_eq!(TransactionService::parse_amount(" 500 ").unwrap(), dec!(500));
        assert_eq!(
            TransactionService::parse_amount("120.55").unwrap(),
            dec!(120.55)
        );
    }

    #[test]
    fn parse_rejects_garbage_and_non_positive() {
        assert!(matches!(
            TransactionService::parse_amount("lunch"),
            Err(CoreError::InvalidAmount(_))
        ));
        assert!(matches!(
            TransactionService::parse_amount("-5"),
            Err(CoreError::InvalidAmount(_))
        ));
        assert!(matches!(
            TransactionService::parse_amount("0"),
            Err(CoreError::InvalidAmount(_))
        ));
    }
}
