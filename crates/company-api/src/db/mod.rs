//! # Database Persistence Layer
//!
//! Postgres persistence for platform state via SQLx.
//!
//! ## Architecture
//!
//! The database layer is **optional**. When `DATABASE_URL` is set, the API
//! persists companies, onboarding profiles, and sessions to PostgreSQL and
//! rebuilds the in-memory stores from it on startup. When absent, the API
//! operates in in-memory-only mode (suitable for development and testing).

pub mod companies;
pub mod profiles;
pub mod sessions;

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

const MAX_CONNECTIONS: u32 = 20;
const MIN_CONNECTIONS: u32 = 2;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Initialize the database connection pool and run migrations.
///
/// Returns `None` if `DATABASE_URL` is not set (in-memory-only mode).
/// Returns `Err` if the URL is set but the connection or migration fails.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        tracing::warn!(
            "DATABASE_URL not set — running without persistence. \
             State will be lost on restart."
        );
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .min_connections(MIN_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(&url)
        .await?;
    tracing::info!(max_connections = MAX_CONNECTIONS, "connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("database migrations applied");

    Ok(Some(pool))
}
