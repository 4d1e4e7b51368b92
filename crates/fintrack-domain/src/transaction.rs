//! Domain model for recorded income and expense operations.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// A single recorded operation. Amounts are strictly positive decimals;
/// whether the money came in or went out follows from the category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category_id: Uuid,
    #[serde(default)]
    pub description: String,
}

impl Transaction {
    pub fn new(
        user_id: Uuid,
        amount: Decimal,
        date: NaiveDate,
        category_id: Uuid,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            amount,
            date,
            category_id,
            description: description.into(),
        }
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl OwnedByUser for Transaction {
    fn user_id(&self) -> Uuid {
        self.user_id
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!("{}: {}", self.date, self.amount)
    }
}
