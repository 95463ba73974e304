//! CLI subcommands.

pub mod account;
pub mod migrate;

use secrecy::SecretString;

/// Read the database URL, preferring `AUTH_DATABASE_URL` over `DATABASE_URL`.
fn database_url() -> Option<SecretString> {
    dotenvy::dotenv().ok();

    std::env::var("AUTH_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .map(SecretString::from)
}
