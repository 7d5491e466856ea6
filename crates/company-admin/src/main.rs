//! # company-admin CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use company_admin::company::{run_company, CompanyArgs};
use company_admin::session::{run_session, SessionArgs};

/// Operator CLI for the company platform.
///
/// Registers company accounts and manages the bearer sessions the HTTP API
/// authenticates against. All subcommands require `DATABASE_URL`.
#[derive(Parser, Debug)]
#[command(name = "company-admin", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Company account management (create, show).
    Company(CompanyArgs),

    /// Session lifecycle management (issue, revoke, purge).
    Session(SessionArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Company(args) => run_company(&args).await,
        Commands::Session(args) => run_session(&args).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
