//! Credential storage.
//!
//! # Database: `wednfest_auth`
//!
//! ## Tables
//!
//! - `auth.account` - Users and vendors in one table, discriminated by `kind`.
//!   `email` carries a unique index so the two account spaces share a single
//!   email namespace.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p wednfest-cli -- migrate
//! ```
//!
//! # Implementations
//!
//! - [`PgCredentialStore`] - `PostgreSQL`, used in production
//! - [`InMemoryCredentialStore`] - process-local map for tests and local runs

pub mod accounts;
pub mod memory;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use wednfest_core::Email;

use crate::models::{Account, NewAccount};

pub use accounts::PgCredentialStore;
pub use memory::InMemoryCredentialStore;

/// Errors from credential store operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Persistence operations the auth flows depend on.
///
/// Every method is atomic for a single account. Email uniqueness across the
/// user and vendor spaces is enforced here, not by callers: `create` must
/// return [`RepositoryError::Conflict`] for an email that already exists in
/// either space, even when two signups race.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up an account by email across both account spaces.
    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, RepositoryError>;

    /// Insert a new account.
    async fn create(&self, account: NewAccount) -> Result<Account, RepositoryError>;

    /// Set `verified` to true. Returns `NotFound` if no account has this email.
    async fn mark_verified(&self, email: &Email) -> Result<(), RepositoryError>;

    /// Replace the password hash. Returns `NotFound` if no account has this email.
    async fn update_password(&self, email: &Email, password_hash: &str)
    -> Result<(), RepositoryError>;

    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
