//! Account domain types.
//!
//! These types represent validated domain objects separate from database
//! row types.

use chrono::{DateTime, Utc};

use agrotreg_core::{AccountId, Email, Role};

/// A registered account (domain type).
#[derive(Debug, Clone)]
pub struct Account {
    /// Unique account ID.
    pub id: AccountId,
    /// Display name; also the ownership key for the farmer's remote products.
    pub name: String,
    /// The account's email address.
    pub email: Email,
    /// Argon2id password hash.
    pub password_hash: String,
    /// What the account may do.
    pub role: Role,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Whether this account is a farmer.
    #[must_use]
    pub fn is_farmer(&self) -> bool {
        self.role == Role::Fermer
    }

    /// Whether this account is an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
