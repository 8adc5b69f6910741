//! Utility functions and helpers

use rust_decimal::prelude::*;

/// Monetary precision used across the engine
pub const MONEY_SCALE: u32 = 2;

/// Round a monetary value to 2 decimals, half away from zero
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Calculate percentage change, 0 when the old value is not positive
pub fn calculate_percentage_change(old_value: Decimal, new_value: Decimal) -> Decimal {
    if old_value > Decimal::ZERO {
        round_money((new_value - old_value) / old_value * Decimal::ONE_HUNDRED)
    } else {
        Decimal::ZERO
    }
}

/// Multiplier for a percentage, e.g. 5 -> 1.05 and -5 -> 0.95
pub fn percent_factor(percent: Decimal) -> Option<Decimal> {
    Decimal::ONE.checked_add(percent.checked_div(Decimal::ONE_HUNDRED)?)
}

/// Generate unique ID
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(dec!(1.005)), dec!(1.01));
        assert_eq!(round_money(dec!(1.015)), dec!(1.02));
        assert_eq!(round_money(dec!(-1.005)), dec!(-1.01));
        assert_eq!(round_money(dec!(1.004)), dec!(1.00));
    }

    #[test]
    fn test_calculate_percentage_change() {
        assert_eq!(calculate_percentage_change(dec!(1000), dec!(950)), dec!(-5));
        assert_eq!(calculate_percentage_change(dec!(0), dec!(950)), Decimal::ZERO);
        assert_eq!(calculate_percentage_change(dec!(3), dec!(4)), dec!(33.33));
    }

    #[test]
    fn test_percent_factor() {
        assert_eq!(percent_factor(dec!(5)), Some(dec!(1.05)));
        assert_eq!(percent_factor(dec!(-25)), Some(dec!(0.75)));
    }
}
