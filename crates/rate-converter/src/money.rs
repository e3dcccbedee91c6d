//! Rounding, input normalization and conversion arithmetic.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Direction;

/// Decimal places kept for monetary amounts.
pub const MONEY_DP: u32 = 2;

/// Decimal places kept for the exchange rate.
pub const RATE_DP: u32 = 3;

/// Rounds a monetary amount to 2 places, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds an exchange rate to 3 places, half away from zero.
pub fn round_rate(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(RATE_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Turns whatever the user typed into an amount.
///
/// Only ASCII digits survive; everything else (separators, signs, decimal
/// points, letters) is dropped. Input without digits yields zero, and a
/// number too large for `Decimal` saturates at `Decimal::MAX`.
pub fn sanitize_amount(raw: &str) -> Decimal {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Decimal::ZERO;
    }
    // Only overflow can fail here.
    Decimal::from_str(digits).unwrap_or(Decimal::MAX)
}

/// Converted amount before commission, rounded to 2 places.
///
/// A zero rate yields zero in the division case. Overflow saturates at
/// `Decimal::MAX`.
pub fn gross_amount(amount: Decimal, rate: Decimal, direction: Direction) -> Decimal {
    let raw = match direction {
        Direction::CnyToRub => amount.checked_mul(rate).unwrap_or(Decimal::MAX),
        Direction::RubToCny => {
            if rate.is_zero() {
                Decimal::ZERO
            } else {
                amount.checked_div(rate).unwrap_or(Decimal::MAX)
            }
        }
    };
    round_money(raw)
}

/// Amount the customer receives after the commission is taken.
pub fn net_amount(gross: Decimal, commission_fee: Decimal) -> Decimal {
    round_money(gross * (Decimal::ONE - commission_fee))
}

/// The commission itself, as displayed under the result.
pub fn commission_amount(gross: Decimal, commission_fee: Decimal) -> Decimal {
    round_money(gross * commission_fee)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_sanitize_strips_non_digits() {
        assert_eq!(sanitize_amount("12a3,456"), dec!(123456));
        assert_eq!(sanitize_amount("1 000"), dec!(1000));
        assert_eq!(sanitize_amount("-50"), dec!(50));
        assert_eq!(sanitize_amount("12.5"), dec!(125));
    }

    #[test]
    fn test_sanitize_empty_is_zero() {
        assert_eq!(sanitize_amount(""), Decimal::ZERO);
        assert_eq!(sanitize_amount("abc"), Decimal::ZERO);
        assert_eq!(sanitize_amount("٣"), Decimal::ZERO);
    }

    #[test]
    fn test_sanitize_saturates_when_too_long() {
        assert_eq!(
            sanitize_amount(&"1".repeat(29)),
            Decimal::from_str(&"1".repeat(29)).unwrap()
        );
        assert_eq!(sanitize_amount(&"9".repeat(29)), Decimal::MAX);
        assert_eq!(sanitize_amount(&"9".repeat(40)), Decimal::MAX);
    }

    #[test]
    fn test_sanitize_leading_zeros() {
        assert_eq!(sanitize_amount("007"), dec!(7));
        assert_eq!(sanitize_amount(&format!("{}5", "0".repeat(40))), dec!(5));
        assert_eq!(sanitize_amount("000"), Decimal::ZERO);
    }

    #[test]
    fn test_gross_per_direction() {
        assert_eq!(
            gross_amount(dec!(1000), dec!(11.5), Direction::CnyToRub),
            dec!(11500.00)
        );
        assert_eq!(
            gross_amount(dec!(1000), dec!(11.5), Direction::RubToCny),
            dec!(86.96)
        );
    }

    #[test]
    fn test_gross_zero_rate_guard() {
        assert_eq!(
            gross_amount(dec!(1000), Decimal::ZERO, Direction::RubToCny),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_gross_saturates_on_overflow() {
        assert_eq!(
            gross_amount(Decimal::MAX, dec!(11.5), Direction::CnyToRub),
            Decimal::MAX
        );
    }

    #[test]
    fn test_net_and_commission() {
        let gross = dec!(11500.00);
        assert_eq!(net_amount(gross, dec!(0.02)), dec!(11270.00));
        assert_eq!(commission_amount(gross, dec!(0.02)), dec!(230.00));
        assert!(net_amount(gross, dec!(0.02)) <= gross);
    }

    #[test]
    fn test_rounding_is_half_up() {
        assert_eq!(round_money(dec!(0.125)), dec!(0.13));
        assert_eq!(round_money(dec!(0.124)), dec!(0.12));
        assert_eq!(round_rate(dec!(12.3455)), dec!(12.346));
        assert_eq!(round_rate(dec!(12.345678)), dec!(12.346));
    }
}
