//! Session persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `company_sessions`
//! table. Only the secret hash is ever stored; plaintext session secrets
//! never reach the database.

use chrono::{DateTime, Utc};
use company_core::{CompanyId, SessionId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::state::SessionRecord;

/// Insert a new session record.
pub async fn insert(pool: &PgPool, record: &SessionRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO company_sessions (id, company_id, secret_hash, created_at, expires_at, revoked)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(record.id.as_uuid())
    .bind(record.company_id.as_uuid())
    .bind(&record.secret_hash)
    .bind(record.created_at)
    .bind(record.expires_at)
    .bind(record.revoked)
    .execute(pool)
    .await?;

    Ok(())
}

/// Mark a session revoked.
pub async fn revoke(pool: &PgPool, id: SessionId) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE company_sessions SET revoked = TRUE WHERE id = $1")
        .bind(id.as_uuid())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete sessions past their expiry. Returns the number removed.
pub async fn purge_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM company_sessions WHERE expires_at <= NOW()")
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Load all sessions from the database into the in-memory store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<SessionRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, SessionRow>(
        "SELECT id, company_id, secret_hash, created_at, expires_at, revoked
         FROM company_sessions ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(SessionRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    company_id: Uuid,
    secret_hash: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    revoked: bool,
}

impl SessionRow {
    fn into_record(self) -> SessionRecord {
        SessionRecord {
            id: SessionId::from_uuid(self.id),
            company_id: CompanyId::from_uuid(self.company_id),
            secret_hash: self.secret_hash,
            created_at: self.created_at,
            expires_at: self.expires_at,
            revoked: self.revoked,
        }
    }
}
