//! Presentation-time formatting. Amounts accumulate at full precision and
//! are rounded only here.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

/// Renders an amount with two decimal places and a trailing currency
/// symbol, e.g. `1234.50 ₽`.
pub fn format_amount(amount: Decimal, symbol: &str) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2} {symbol}")
}

/// Renders a ratio that is already scaled to percent, with one decimal
/// place, e.g. `104.5%`.
pub fn format_percent(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.1}%")
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn amounts_round_half_away_from_zero() {
        assert_eq!(format_amount(dec!(1234.505), "₽"), "1234.51 ₽");
        assert_eq!(format_amount(dec!(1234.5), "₽"), "1234.50 ₽");
        assert_eq!(format_amount(dec!(3000), "₽"), "3000.00 ₽");
    }

    #[test]
    fn percents_keep_one_decimal() {
        assert_eq!(format_percent(dec!(104.49)), "104.5%");
        assert_eq!(format_percent(dec!(100)), "100.0%");
    }
}
