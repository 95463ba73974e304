//! wedNfest CLI - Database migrations and account management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! wf-cli migrate
//!
//! # Mark an account verified without the email link
//! wf-cli account verify alice@example.com
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `account verify` - Mark an account's email as verified

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "wf-cli")]
#[command(author, version, about = "wedNfest auth CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage accounts
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Mark an account's email as verified
    Verify {
        /// Account email address
        email: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Account { action } => match action {
            AccountAction::Verify { email } => commands::account::verify(&email).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_account_verify() {
        let cli = Cli::try_parse_from(["wf-cli", "account", "verify", "a@x.com"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Account {
                action: AccountAction::Verify { .. }
            })
        ));
    }
}
