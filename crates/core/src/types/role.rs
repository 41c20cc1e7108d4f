//! Account roles.

use serde::{Deserialize, Serialize};

/// Role attached to an authenticated account.
///
/// Visitors use the storefront; the remaining roles belong to back-office
/// staff and gate their respective dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Visitor,
    Admin,
    Caretaker,
    Maintenance,
    Manager,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Visitor => write!(f, "visitor"),
            Self::Admin => write!(f, "admin"),
            Self::Caretaker => write!(f, "caretaker"),
            Self::Maintenance => write!(f, "maintenance"),
            Self::Manager => write!(f, "manager"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "visitor" => Ok(Self::Visitor),
            "admin" => Ok(Self::Admin),
            "caretaker" => Ok(Self::Caretaker),
            "maintenance" => Ok(Self::Maintenance),
            "manager" => Ok(Self::Manager),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}
