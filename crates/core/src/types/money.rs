//! Money display formatting.
//!
//! All internal price math runs on [`rust_decimal::Decimal`] at full
//! precision. Rounding to two decimal places happens here, at display time,
//! and nowhere else.

use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount as a USD display string, e.g. `"$19.99"`.
///
/// Rounds to two decimal places with standard currency rounding (midpoint
/// away from zero, so `$97.425` displays as `"$97.43"`).
#[must_use]
pub fn format_usd(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${rounded:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_usd_pads_to_two_places() {
        assert_eq!(format_usd(Decimal::new(5, 0)), "$5.00");
        assert_eq!(format_usd(Decimal::new(51, 1)), "$5.10");
    }

    #[test]
    fn test_format_usd_rounds_midpoint_away_from_zero() {
        // 97.425 is the silver-tier example total; bankers rounding would
        // produce $97.42 here, currency rounding must not.
        assert_eq!(format_usd(Decimal::new(97_425, 3)), "$97.43");
    }

    #[test]
    fn test_format_usd_zero() {
        assert_eq!(format_usd(Decimal::ZERO), "$0.00");
    }
}
