//! Company persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `companies` table.

use chrono::{DateTime, Utc};
use company_core::CompanyId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::state::{CompanyRecord, CompanyStatus};

/// Insert a new company record.
pub async fn insert(pool: &PgPool, record: &CompanyRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO companies (id, name, email, status, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(record.id.as_uuid())
    .bind(&record.name)
    .bind(&record.email)
    .bind(record.status.as_str())
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Update a company's mutable fields (name, status, updated_at).
pub async fn update(pool: &PgPool, record: &CompanyRecord) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("UPDATE companies SET name = $1, status = $2, updated_at = $3 WHERE id = $4")
            .bind(&record.name)
            .bind(record.status.as_str())
            .bind(record.updated_at)
            .bind(record.id.as_uuid())
            .execute(pool)
            .await?;

    Ok(result.rows_affected() > 0)
}

/// Fetch a company by ID.
pub async fn get_by_id(pool: &PgPool, id: CompanyId) -> Result<Option<CompanyRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, CompanyRow>(
        "SELECT id, name, email, status, created_at, updated_at
         FROM companies WHERE id = $1",
    )
    .bind(id.as_uuid())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(CompanyRow::into_record))
}

/// Load all companies from the database into the in-memory store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<CompanyRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CompanyRow>(
        "SELECT id, name, email, status, created_at, updated_at
         FROM companies ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(CompanyRow::into_record).collect())
}

fn parse_company_status(s: &str) -> CompanyStatus {
    match s {
        "PENDING_ONBOARDING" => CompanyStatus::PendingOnboarding,
        "ACTIVE" => CompanyStatus::Active,
        "SUSPENDED" => CompanyStatus::Suspended,
        other => {
            tracing::error!(
                status = other,
                "unknown company status in database; defaulting to PENDING_ONBOARDING"
            );
            CompanyStatus::PendingOnboarding
        }
    }
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct CompanyRow {
    id: Uuid,
    name: String,
    email: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CompanyRow {
    fn into_record(self) -> CompanyRecord {
        CompanyRecord {
            id: CompanyId::from_uuid(self.id),
            name: self.name,
            email: self.email,
            status: parse_company_status(&self.status),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
