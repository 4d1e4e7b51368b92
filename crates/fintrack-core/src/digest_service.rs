//! Builds the one-line daily digest sent to opted-in chat users.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use fintrack_domain::{CategoryKind, DateWindow};

use crate::{format, FinanceStore, Result};

/// A prepared digest waiting for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestMessage {
    pub chat_id: i64,
    pub text: String,
}

/// Prepares digest lines; delivery is someone else's job.
pub struct DigestService;

impl DigestService {
    /// The digest line for one user: their expense sum for `today` only.
    pub fn today_line(
        store: &dyn FinanceStore,
        user_id: Uuid,
        today: NaiveDate,
        currency_symbol: &str,
    ) -> Result<String> {
        let spent = Self::spent_today(store, user_id, today)?;
        Ok(format!(
            "📅 Daily report:\nSpent today: {}",
            format::format_amount(spent, currency_symbol)
        ))
    }

    /// Digest lines for every eligible user. A linked user without a chat id
    /// is a data anomaly; it is logged and skipped, never an error.
    pub fn prepare(
        store: &dyn FinanceStore,
        today: NaiveDate,
        currency_symbol: &str,
    ) -> Result<Vec<DigestMessage>> {
        let mut messages = Vec::new();
        for user in store.digest_recipients()? {
            let Some(chat_id) = user.telegram_id else {
                tracing::warn!(user = %user.username, "digest recipient has no chat id, skipping");
                continue;
            };
            messages.push(DigestMessage {
                chat_id,
                text: Self::today_line(store, user.id, today, currency_symbol)?,
            });
        }
        Ok(messages)
    }

    fn spent_today(store: &dyn FinanceStore, user_id: Uuid, today: NaiveDate) -> Result<Decimal> {
        let expenses = store.transactions_in(
            user_id,
            DateWindow::single_day(today),
            Some(CategoryKind::Expense),
        )?;
        Ok(expenses.iter().map(|txn| txn.amount).sum())
    }
}
