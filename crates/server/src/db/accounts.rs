//! `PostgreSQL` credential store.
//!
//! Users and vendors share the `auth.account` table. Vendor-only columns are
//! nullable and checked when a row is converted back into an [`Account`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use wednfest_core::{AccountId, AccountKind, BusinessCategory, Email, IndianState, Phone, Role};

use super::{CredentialStore, RepositoryError};
use crate::models::{Account, NewAccount, Profile, UserProfile, VendorProfile};

const ACCOUNT_COLUMNS: &str = "id, kind, email, password_hash, verified, first_name, last_name, \
     role, business_name, business_category, phone, state, created_at, updated_at";

/// Raw `auth.account` row.
#[derive(Debug, FromRow)]
struct AccountRow {
    id: i32,
    kind: String,
    email: String,
    password_hash: Option<String>,
    verified: bool,
    first_name: String,
    last_name: String,
    role: Option<String>,
    business_name: Option<String>,
    business_category: Option<String>,
    phone: Option<String>,
    state: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn corrupt(column: &str, detail: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::DataCorruption(format!("invalid {column} in database: {detail}"))
}

fn required(column: &str, value: Option<String>) -> Result<String, RepositoryError> {
    value.ok_or_else(|| corrupt(column, "missing for vendor account"))
}

impl TryFrom<AccountRow> for Account {
    type Error = RepositoryError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| corrupt("email", e))?;
        let kind: AccountKind = row.kind.parse().map_err(|e| corrupt("kind", e))?;

        let profile = match kind {
            AccountKind::User => {
                let role = match row.role {
                    Some(r) => r.parse::<Role>().map_err(|e| corrupt("role", e))?,
                    None => Role::default(),
                };
                Profile::User(UserProfile {
                    first_name: row.first_name,
                    last_name: row.last_name,
                    role,
                })
            }
            AccountKind::Vendor => {
                let business_category = required("business_category", row.business_category)?
                    .parse::<BusinessCategory>()
                    .map_err(|e| corrupt("business_category", e))?;
                let phone = Phone::parse(&required("phone", row.phone)?)
                    .map_err(|e| corrupt("phone", e))?;
                let state = required("state", row.state)?
                    .parse::<IndianState>()
                    .map_err(|e| corrupt("state", e))?;
                Profile::Vendor(VendorProfile {
                    first_name: row.first_name,
                    last_name: row.last_name,
                    business_name: required("business_name", row.business_name)?,
                    business_category,
                    phone,
                    state,
                })
            }
        };

        Ok(Self {
            id: AccountId::new(row.id),
            email,
            password_hash: row.password_hash,
            verified: row.verified,
            profile,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Credential store backed by `PostgreSQL`.
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    /// Create a new store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM auth.account WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Account::try_from).transpose()
    }

    async fn create(&self, account: NewAccount) -> Result<Account, RepositoryError> {
        let (first_name, last_name, role, business_name, business_category, phone, state) =
            match &account.profile {
                Profile::User(p) => (
                    p.first_name.as_str(),
                    p.last_name.as_str(),
                    Some(p.role.as_str()),
                    None,
                    None,
                    None,
                    None,
                ),
                Profile::Vendor(p) => (
                    p.first_name.as_str(),
                    p.last_name.as_str(),
                    None,
                    Some(p.business_name.as_str()),
                    Some(p.business_category.as_str()),
                    Some(p.phone.as_str()),
                    Some(p.state.as_str()),
                ),
            };

        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "INSERT INTO auth.account \
                 (kind, email, password_hash, first_name, last_name, role, \
                  business_name, business_category, phone, state) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(account.profile.kind().as_str())
        .bind(account.email.as_str())
        .bind(account.password_hash.as_deref())
        .bind(first_name)
        .bind(last_name)
        .bind(role)
        .bind(business_name)
        .bind(business_category)
        .bind(phone)
        .bind(state)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Account::try_from(row)
    }

    async fn mark_verified(&self, email: &Email) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE auth.account SET verified = TRUE, updated_at = NOW() WHERE email = $1",
        )
        .bind(email.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn update_password(
        &self,
        email: &Email,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE auth.account SET password_hash = $2, updated_at = NOW() WHERE email = $1",
        )
        .bind(email.as_str())
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
