//! Account management commands.
//!
//! # Usage
//!
//! ```bash
//! wf-cli account verify alice@example.com
//! ```

use thiserror::Error;

use wednfest_core::{Email, EmailError};
use wednfest_server::db::{CredentialStore, PgCredentialStore, RepositoryError, create_pool};

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Missing environment variable: AUTH_DATABASE_URL")]
    MissingDatabaseUrl,

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("No account registered with email: {0}")]
    NotFound(Email),

    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

/// Mark an account's email as verified.
///
/// # Errors
///
/// Returns `AccountError::NotFound` if no account has this email.
pub async fn verify(email: &str) -> Result<(), AccountError> {
    let email = Email::parse(email)?;
    let database_url = super::database_url().ok_or(AccountError::MissingDatabaseUrl)?;

    tracing::info!("Connecting to auth database...");
    let store = PgCredentialStore::new(create_pool(&database_url).await?);

    store.mark_verified(&email).await.map_err(|e| match e {
        RepositoryError::NotFound => AccountError::NotFound(email.clone()),
        other => AccountError::Repository(other),
    })?;

    tracing::info!("Account verified: {}", email);
    Ok(())
}
