//! Account domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use wednfest_core::{AccountId, AccountKind, BusinessCategory, Email, IndianState, Phone, Role};

/// A registered account in either the user or vendor space.
///
/// `Debug` is implemented by hand so the password hash never reaches logs.
#[derive(Clone)]
pub struct Account {
    /// Unique account ID.
    pub id: AccountId,
    /// Normalized email address, unique across both account spaces.
    pub email: Email,
    /// Argon2 PHC string. Vendors have none until they reset their password.
    pub password_hash: Option<String>,
    /// Whether the email has been verified.
    pub verified: bool,
    /// Space-specific profile fields.
    pub profile: Profile,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Which account space this record lives in.
    #[must_use]
    pub const fn kind(&self) -> AccountKind {
        self.profile.kind()
    }

    /// Public representation without credential material.
    #[must_use]
    pub fn view(&self) -> AccountView {
        AccountView {
            id: self.id,
            email: self.email.clone(),
            verified: self.verified,
            profile: self.profile.clone(),
            created_at: self.created_at,
        }
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("email", &self.email)
            .field(
                "password_hash",
                &self.password_hash.as_ref().map(|_| "[REDACTED]"),
            )
            .field("verified", &self.verified)
            .field("profile", &self.profile)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Profile fields that depend on the account space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Profile {
    User(UserProfile),
    Vendor(VendorProfile),
}

impl Profile {
    /// The account space matching this profile.
    #[must_use]
    pub const fn kind(&self) -> AccountKind {
        match self {
            Self::User(_) => AccountKind::User,
            Self::Vendor(_) => AccountKind::Vendor,
        }
    }
}

/// Customer profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

/// Vendor business profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorProfile {
    pub first_name: String,
    pub last_name: String,
    pub business_name: String,
    pub business_category: BusinessCategory,
    pub phone: Phone,
    pub state: IndianState,
}

/// Data required to insert a new account.
#[derive(Clone)]
pub struct NewAccount {
    pub email: Email,
    pub password_hash: Option<String>,
    pub profile: Profile,
}

/// A validated customer signup.
///
/// Holds the plaintext password until it is hashed, so it has no `Debug`.
#[derive(Clone)]
pub struct NewUser {
    pub email: Email,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// A validated vendor registration.
#[derive(Debug, Clone)]
pub struct NewVendor {
    pub email: Email,
    pub profile: VendorProfile,
}

/// Account data safe to return to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: AccountId,
    pub email: Email,
    pub verified: bool,
    #[serde(flatten)]
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
}
