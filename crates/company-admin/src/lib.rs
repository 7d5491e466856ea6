//! # company-admin — Operator CLI for the Company Platform
//!
//! Companies are registered and sessions are minted out of band by an
//! operator; the HTTP API only ever authenticates against what this tool
//! has written to the database.
//!
//! ## Subcommands
//!
//! - `company-admin company create` — Register a new company account.
//! - `company-admin company show` — Inspect a company and its profile.
//! - `company-admin session issue` — Mint a bearer session token.
//! - `company-admin session revoke` — Revoke a session immediately.
//! - `company-admin session purge` — Delete expired session rows.
//!
//! ## Database
//!
//! Every subcommand talks to Postgres directly. `DATABASE_URL` must be
//! set; unlike the API there is no in-memory fallback, because anything
//! minted here has to survive an API restart.

pub mod company;
pub mod session;

use anyhow::{anyhow, Context, Result};
use sqlx::PgPool;

/// Connect to the platform database.
///
/// Reuses the API's pool initialization (including migrations), but turns
/// the in-memory fallback into a hard error.
pub async fn connect() -> Result<PgPool> {
    company_api::db::init_pool()
        .await
        .context("failed to connect to database")?
        .ok_or_else(|| anyhow!("DATABASE_URL is not set; the admin CLI requires a database"))
}
