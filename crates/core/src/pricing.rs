//! The pricing pipeline: subtotal → discount → tax → total.
//!
//! [`compute_totals`] is a pure function over validated line items. Tax is
//! computed on the post-discount amount; reversing that order changes the
//! total for any nonzero discount. No currency rounding happens here -
//! rounding to two decimal places is a presentation concern
//! ([`crate::types::money::format_usd`]).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::LineItem;

/// Default sales tax rate: 8.25%.
///
/// Exposed as a default rather than baked into the pipeline; the storefront
/// reads the effective rate from configuration.
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(825, 0, 0, false, 4);

/// Derived totals for a cart. Never stored; recomputed from the items.
///
/// Invariant: `total = subtotal - discount + tax` exactly, at full decimal
/// precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub subtotal: Decimal,
    pub discount_rate: Decimal,
    pub discount: Decimal,
    pub tax_rate: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Compute totals for a set of line items.
///
/// - `subtotal = Σ (unit_price × quantity)`
/// - `discount = subtotal × discount_rate`
/// - `tax = (subtotal − discount) × tax_rate` (strictly post-discount)
/// - `total = subtotal − discount + tax`
///
/// An empty item list yields an all-zero result. Inputs are assumed
/// validated (non-negative prices, quantity ≥ 1); that contract is enforced
/// where items enter the cart.
#[must_use]
pub fn compute_totals(items: &[LineItem], discount_rate: Decimal, tax_rate: Decimal) -> PricingResult {
    let subtotal: Decimal = items.iter().map(LineItem::line_total).sum();
    let discount = subtotal * discount_rate;
    let tax = (subtotal - discount) * tax_rate;
    let total = subtotal - discount + tax;

    PricingResult {
        subtotal,
        discount_rate,
        discount,
        tax_rate,
        tax,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MembershipTier;

    fn item(id: &str, unit_price: Decimal, quantity: u32) -> LineItem {
        LineItem {
            id: id.to_string(),
            name: format!("Item {id}"),
            unit_price,
            quantity,
            category: "ticket".to_string(),
        }
    }

    #[test]
    fn test_silver_tier_worked_example() {
        // Subtotal $100, silver (10%) => discount $10, tax on $90 at 8.25%
        // = $7.425, total $97.425.
        let items = vec![item("day-pass", Decimal::new(2500, 2), 4)];
        let result = compute_totals(
            &items,
            MembershipTier::Silver.discount_rate(),
            DEFAULT_TAX_RATE,
        );

        assert_eq!(result.subtotal, Decimal::new(100, 0));
        assert_eq!(result.discount, Decimal::new(10, 0));
        assert_eq!(result.tax, Decimal::new(7_425, 3));
        assert_eq!(result.total, Decimal::new(97_425, 3));
    }

    #[test]
    fn test_tax_applies_after_discount() {
        let items = vec![item("plush", Decimal::new(100, 0), 1)];
        let rate = MembershipTier::Gold.discount_rate();
        let result = compute_totals(&items, rate, DEFAULT_TAX_RATE);

        // Tax on the discounted amount, not the subtotal.
        assert_eq!(result.tax, (result.subtotal - result.discount) * DEFAULT_TAX_RATE);
        assert!(result.tax < result.subtotal * DEFAULT_TAX_RATE);
    }

    #[test]
    fn test_total_identity_holds() {
        let items = vec![
            item("day-pass", Decimal::new(1850, 2), 3),
            item("plush", Decimal::new(1299, 2), 2),
        ];
        for tier in [
            MembershipTier::None,
            MembershipTier::Bronze,
            MembershipTier::Silver,
            MembershipTier::Gold,
        ] {
            let result = compute_totals(&items, tier.discount_rate(), DEFAULT_TAX_RATE);
            assert_eq!(result.total, result.subtotal - result.discount + result.tax);
        }
    }

    #[test]
    fn test_empty_items_yield_zero_not_error() {
        let result = compute_totals(&[], MembershipTier::Gold.discount_rate(), DEFAULT_TAX_RATE);
        assert_eq!(result.subtotal, Decimal::ZERO);
        assert_eq!(result.discount, Decimal::ZERO);
        assert_eq!(result.tax, Decimal::ZERO);
        assert_eq!(result.total, Decimal::ZERO);
    }

    #[test]
    fn test_deterministic_for_same_inputs() {
        let items = vec![item("day-pass", Decimal::new(1850, 2), 2)];
        let rate = MembershipTier::Bronze.discount_rate();
        let a = compute_totals(&items, rate, DEFAULT_TAX_RATE);
        let b = compute_totals(&items, rate, DEFAULT_TAX_RATE);
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_discount_rate_means_tax_on_subtotal() {
        let items = vec![item("map", Decimal::new(400, 2), 1)];
        let result = compute_totals(&items, Decimal::ZERO, DEFAULT_TAX_RATE);
        assert_eq!(result.discount, Decimal::ZERO);
        assert_eq!(result.tax, result.subtotal * DEFAULT_TAX_RATE);
    }
}
