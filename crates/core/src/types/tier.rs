//! Membership tiers and their discount rates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A visitor's membership tier.
///
/// Applied as a percentage discount off the cart subtotal. A visitor without
/// a membership record is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MembershipTier {
    #[default]
    None,
    Bronze,
    Silver,
    Gold,
}

impl MembershipTier {
    /// The discount rate for this tier, as a fraction of the subtotal.
    #[must_use]
    pub const fn discount_rate(self) -> Decimal {
        match self {
            Self::None => Decimal::ZERO,
            Self::Bronze => Decimal::from_parts(5, 0, 0, false, 2), // 0.05
            Self::Silver => Decimal::from_parts(10, 0, 0, false, 2), // 0.10
            Self::Gold => Decimal::from_parts(15, 0, 0, false, 2),  // 0.15
        }
    }

    /// Parse a tier label, falling back to `None` for anything unrecognized.
    ///
    /// Membership records arrive from the backend as free-form strings; an
    /// absent or unknown tier means no discount rather than an error.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "bronze" => Self::Bronze,
            "silver" => Self::Silver,
            "gold" => Self::Gold,
            _ => Self::None,
        }
    }
}

impl std::fmt::Display for MembershipTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Bronze => write!(f, "bronze"),
            Self::Silver => write!(f, "silver"),
            Self::Gold => write!(f, "gold"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_rates() {
        assert_eq!(MembershipTier::None.discount_rate(), Decimal::ZERO);
        assert_eq!(MembershipTier::Bronze.discount_rate(), Decimal::new(5, 2));
        assert_eq!(MembershipTier::Silver.discount_rate(), Decimal::new(10, 2));
        assert_eq!(MembershipTier::Gold.discount_rate(), Decimal::new(15, 2));
    }

    #[test]
    fn test_from_label_unknown_defaults_to_none() {
        assert_eq!(MembershipTier::from_label("platinum"), MembershipTier::None);
        assert_eq!(MembershipTier::from_label(""), MembershipTier::None);
        assert_eq!(MembershipTier::from_label(" Gold "), MembershipTier::Gold);
    }
}
