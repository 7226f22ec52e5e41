//! Currency helpers

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::iso::{Currency, EUR, GBP, INR, USD};

/// Look up a supported currency by its ISO 4217 code.
pub fn find_currency(code: &str) -> Option<&'static Currency> {
    match code {
        "INR" => Some(INR),
        "USD" => Some(USD),
        "GBP" => Some(GBP),
        "EUR" => Some(EUR),
        _ => None,
    }
}

/// Convert an amount in major units to minor units of `currency`.
///
/// Returns `None` if the amount does not fit in an `i64` once scaled.
pub fn major_to_minor(amount: Decimal, currency: &Currency) -> Option<i64> {
    let scale = Decimal::from(10u64.checked_pow(currency.exponent)?);

    amount
        .checked_mul(scale)
        .and_then(|value| value.round_dp(0).to_i64())
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn find_currency_knows_supported_codes() {
        assert_eq!(find_currency("INR"), Some(INR));
        assert_eq!(find_currency("EUR"), Some(EUR));
        assert_eq!(find_currency("ABC"), None);
    }

    #[test]
    fn major_to_minor_uses_exponent() -> TestResult {
        assert_eq!(major_to_minor(Decimal::from_str("2850.50")?, INR), Some(285_050));
        assert_eq!(major_to_minor(Decimal::from(50_000), INR), Some(5_000_000));

        Ok(())
    }

    #[test]
    fn major_to_minor_overflow_is_none() {
        assert_eq!(major_to_minor(Decimal::MAX, INR), None);
    }
}
