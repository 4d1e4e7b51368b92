use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stores user-configurable preferences for reports and the digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    /// Trailing symbol appended to formatted amounts.
    pub currency_symbol: String,
    /// Local hour (0-23) at which the daily digest fires.
    #[serde(default = "Config::default_digest_hour")]
    pub digest_hour: u32,
    /// How many expense categories monthly reports rank.
    #[serde(default = "Config::default_top_categories")]
    pub top_categories: usize,
    /// Category totals above this trigger an advisory recommendation.
    #[serde(default = "Config::default_large_expense_threshold")]
    pub large_expense_threshold: Decimal,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency_symbol: "₽".into(),
            digest_hour: Self::default_digest_hour(),
            top_categories: Self::default_top_categories(),
            large_expense_threshold: Self::default_large_expense_threshold(),
        }
    }
}

impl Config {
    fn default_digest_hour() -> u32 {
        9
    }

    fn default_top_categories() -> usize {
        3
    }

    fn default_large_expense_threshold() -> Decimal {
        Decimal::from(5000)
    }
}
