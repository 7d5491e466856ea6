//! # Session Subcommand
//!
//! Mints, revokes, and purges the bearer sessions the API authenticates
//! against.
//!
//! ## Security Invariant
//!
//! The plaintext token is printed exactly once, at issuance. Only the
//! SHA-256 hash of the secret reaches the database, so a lost token
//! cannot be recovered; issue a new session instead.

use anyhow::{bail, Context, Result};
use chrono::Duration;
use clap::{Args, Subcommand};
use uuid::Uuid;

use company_api::db;
use company_api::state::SessionRecord;
use company_core::{CompanyId, SessionId};

/// Longest allowed session lifetime: one year.
const MAX_TTL_HOURS: i64 = 24 * 365;

/// Arguments for the `company-admin session` subcommand.
#[derive(Args, Debug)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Session subcommands.
#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Issue a new session token for a company.
    Issue {
        /// Company the session belongs to.
        #[arg(long)]
        company_id: Uuid,
        /// Session lifetime in hours (default: 30 days).
        #[arg(long, default_value_t = 720)]
        ttl_hours: i64,
    },

    /// Revoke a session immediately.
    Revoke {
        /// Session id to revoke.
        #[arg(value_name = "SESSION_ID")]
        id: Uuid,
    },

    /// Delete expired session rows.
    Purge,
}

/// Execute the session subcommand.
pub async fn run_session(args: &SessionArgs) -> Result<u8> {
    match &args.command {
        SessionCommand::Issue {
            company_id,
            ttl_hours,
        } => cmd_issue(*company_id, *ttl_hours).await,
        SessionCommand::Revoke { id } => cmd_revoke(*id).await,
        SessionCommand::Purge => cmd_purge().await,
    }
}

/// Validate a requested session lifetime.
fn validate_ttl(ttl_hours: i64) -> Result<()> {
    if !(1..=MAX_TTL_HOURS).contains(&ttl_hours) {
        bail!("ttl must be between 1 and {MAX_TTL_HOURS} hours, got {ttl_hours}");
    }
    Ok(())
}

/// Issue a session and print the plaintext token once.
async fn cmd_issue(company_id: Uuid, ttl_hours: i64) -> Result<u8> {
    validate_ttl(ttl_hours)?;

    let pool = crate::connect().await?;
    let company_id = CompanyId::from_uuid(company_id);

    let company = match db::companies::get_by_id(&pool, company_id)
        .await
        .context("failed to look up company")?
    {
        Some(company) => company,
        None => bail!("company not found: {company_id}"),
    };

    let (record, token) = SessionRecord::issue(company_id, Duration::hours(ttl_hours));
    db::sessions::insert(&pool, &record)
        .await
        .context("failed to persist session")?;

    tracing::info!(session_id = %record.id, company_id = %company_id, "session issued");

    println!("OK: issued session for {}", company.name);
    println!("  Session ID: {}", record.id);
    println!("  Expires at: {}", record.expires_at.to_rfc3339());
    println!();
    println!("  Bearer token (shown once, store it now):");
    println!("  {token}");

    Ok(0)
}

/// Revoke a session by id.
async fn cmd_revoke(id: Uuid) -> Result<u8> {
    let pool = crate::connect().await?;
    let session_id = SessionId::from_uuid(id);

    let revoked = db::sessions::revoke(&pool, session_id)
        .await
        .context("failed to revoke session")?;
    if !revoked {
        bail!("session not found: {id}");
    }

    tracing::info!(session_id = %session_id, "session revoked");
    println!("OK: revoked session {session_id}");

    Ok(0)
}

/// Delete all expired session rows.
async fn cmd_purge() -> Result<u8> {
    let pool = crate::connect().await?;

    let purged = db::sessions::purge_expired(&pool)
        .await
        .context("failed to purge sessions")?;

    println!("OK: purged {purged} expired sessions");

    Ok(0)
}
