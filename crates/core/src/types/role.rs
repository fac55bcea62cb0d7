//! Account roles.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown role string.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown role: {0}. Valid roles: Fermer, Konsumator, Admin")]
pub struct RoleParseError(pub String);

/// The role an account holds.
///
/// - `Fermer` lists and manages their own products.
/// - `Konsumator` browses the catalog and purchases.
/// - `Admin` manages all accounts and can deactivate any farmer's products.
///
/// Stored in the database as the canonical strings `"Fermer"`,
/// `"Konsumator"`, and `"Admin"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    /// A farmer selling products on the marketplace.
    Fermer,
    /// A consumer browsing and buying.
    #[default]
    Konsumator,
    /// A site administrator.
    Admin,
}

impl Role {
    /// Canonical string form, as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fermer => "Fermer",
            Self::Konsumator => "Konsumator",
            Self::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Fermer" => Ok(Self::Fermer),
            "Konsumator" => Ok(Self::Konsumator),
            "Admin" => Ok(Self::Admin),
            other => Err(RoleParseError(other.to_owned())),
        }
    }
}
