//! Company profile persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `company_profiles`
//! table. The table is keyed by the owning company, mirroring the
//! one-profile-per-company invariant.

use chrono::{DateTime, Utc};
use company_core::CompanyId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::state::{CompanyProfileRecord, CompanySize};

/// Insert a new profile record.
pub async fn insert(pool: &PgPool, record: &CompanyProfileRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO company_profiles (id, company_id, industry, location, company_size,
         website, logo_url, description, phone, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
    )
    .bind(record.id)
    .bind(record.company_id.as_uuid())
    .bind(&record.industry)
    .bind(&record.location)
    .bind(record.company_size.as_str())
    .bind(&record.website)
    .bind(&record.logo_url)
    .bind(&record.description)
    .bind(&record.phone)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Update a profile's mutable fields.
pub async fn update(pool: &PgPool, record: &CompanyProfileRecord) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE company_profiles SET industry = $1, location = $2, company_size = $3,
         website = $4, logo_url = $5, description = $6, phone = $7, updated_at = $8
         WHERE company_id = $9",
    )
    .bind(&record.industry)
    .bind(&record.location)
    .bind(record.company_size.as_str())
    .bind(&record.website)
    .bind(&record.logo_url)
    .bind(&record.description)
    .bind(&record.phone)
    .bind(record.updated_at)
    .bind(record.company_id.as_uuid())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Fetch the profile owned by a company.
pub async fn get_by_company_id(
    pool: &PgPool,
    company_id: CompanyId,
) -> Result<Option<CompanyProfileRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, ProfileRow>(
        "SELECT id, company_id, industry, location, company_size,
         website, logo_url, description, phone, created_at, updated_at
         FROM company_profiles WHERE company_id = $1",
    )
    .bind(company_id.as_uuid())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(ProfileRow::into_record))
}

/// Load all profiles from the database into the in-memory store on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<CompanyProfileRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ProfileRow>(
        "SELECT id, company_id, industry, location, company_size,
         website, logo_url, description, phone, created_at, updated_at
         FROM company_profiles ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(ProfileRow::into_record).collect())
}

fn parse_company_size(s: &str) -> CompanySize {
    match s {
        "micro" => CompanySize::Micro,
        "small" => CompanySize::Small,
        "medium" => CompanySize::Medium,
        "large" => CompanySize::Large,
        "enterprise" => CompanySize::Enterprise,
        other => {
            tracing::error!(
                company_size = other,
                "unknown company size in database; defaulting to micro"
            );
            CompanySize::Micro
        }
    }
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    company_id: Uuid,
    industry: String,
    location: String,
    company_size: String,
    website: Option<String>,
    logo_url: Option<String>,
    description: Option<String>,
    phone: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProfileRow {
    fn into_record(self) -> CompanyProfileRecord {
        CompanyProfileRecord {
            id: self.id,
            company_id: CompanyId::from_uuid(self.company_id),
            industry: self.industry,
            location: self.location,
            company_size: parse_company_size(&self.company_size),
            website: self.website,
            logo_url: self.logo_url,
            description: self.description,
            phone: self.phone,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
