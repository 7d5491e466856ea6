//! # Company Service
//!
//! Business logic behind the company routes. Handlers are pure dispatch:
//! each request resolves to exactly one service call carrying the
//! authenticated company's id, and every business rule lives here.
//!
//! 1. **Onboarding** — a company submits its profile exactly once; the
//!    submission moves a `PENDING_ONBOARDING` company to `ACTIVE`.
//!
//! 2. **Profile view** — registration identity and onboarding profile
//!    composed into a single payload.
//!
//! 3. **Partial update** — PATCH semantics; only provided fields change,
//!    and an empty update is a valid no-op.
//!
//! ## Persistence
//!
//! With a database pool configured, writes land in Postgres before the
//! in-memory stores are touched. Without one the stores are the only copy.

use chrono::{DateTime, Utc};
use company_core::{CompanyId, FieldErrors};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::routes::company::{OnboardingRequest, UpdateCompanyProfileRequest};
use crate::state::{AppState, CompanyProfileRecord, CompanyRecord, CompanyStatus};

// ---------------------------------------------------------------------------
// Service errors
// ---------------------------------------------------------------------------

/// Failures produced by [`CompanyService`].
///
/// `Display` strings are the client-facing messages. Variants carry the
/// company id or field detail for logging; ids never appear in response
/// bodies.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// No company registered under the id.
    #[error("Company not found")]
    CompanyNotFound(Uuid),

    /// The company exists but has not completed onboarding.
    #[error("Company profile not found")]
    ProfileNotFound(Uuid),

    /// The company already submitted its onboarding profile.
    #[error("Company has already completed onboarding")]
    AlreadyOnboarded(Uuid),

    /// A business rule rejected the payload with field-level detail.
    #[error("Validation failed")]
    Invalid(FieldErrors),

    /// Underlying storage failed. `Display` is client-safe; the detail
    /// string is for logs only.
    #[error("An internal error occurred")]
    Storage(String),
}

impl ServiceError {
    /// Field-level detail attached to this failure, when any.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Profile view
// ---------------------------------------------------------------------------

/// Aggregate payload returned by the profile endpoints.
///
/// Mirrors the company record at the top level and nests the full
/// onboarding profile under `profile`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompanyProfileView {
    #[schema(value_type = Uuid)]
    pub id: CompanyId,
    pub name: String,
    pub email: String,
    pub status: CompanyStatus,
    pub profile: CompanyProfileRecord,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CompanyProfileView {
    fn compose(company: CompanyRecord, profile: CompanyProfileRecord) -> Self {
        Self {
            id: company.id,
            name: company.name,
            email: company.email,
            status: company.status,
            profile,
            created_at: company.created_at,
            updated_at: company.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Company service
// ---------------------------------------------------------------------------

/// Business operations over the company stores.
///
/// Borrows [`AppState`]; construct one per request with [`CompanyService::new`].
pub struct CompanyService<'a> {
    state: &'a AppState,
}

impl<'a> CompanyService<'a> {
    /// Create a service over the given state.
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Record a company's onboarding profile.
    ///
    /// Exactly one profile may exist per company. A `PENDING_ONBOARDING`
    /// company becomes `ACTIVE` on success; other statuses are left as
    /// they are.
    pub async fn onboarding(
        &self,
        company_id: CompanyId,
        request: OnboardingRequest,
    ) -> Result<CompanyProfileRecord, ServiceError> {
        let mut company = self
            .state
            .companies
            .get(&company_id)
            .ok_or(ServiceError::CompanyNotFound(*company_id.as_uuid()))?;

        if self.state.profiles.contains(&company_id) {
            return Err(ServiceError::AlreadyOnboarded(*company_id.as_uuid()));
        }

        let now = Utc::now();
        let profile = CompanyProfileRecord {
            id: Uuid::new_v4(),
            company_id,
            industry: request.industry.trim().to_string(),
            location: request.location.trim().to_string(),
            company_size: request.company_size,
            website: normalize_optional(request.website),
            logo_url: normalize_optional(request.logo_url),
            description: normalize_optional(request.description),
            phone: normalize_optional(request.phone),
            created_at: now,
            updated_at: now,
        };

        if company.status == CompanyStatus::PendingOnboarding {
            company.status = CompanyStatus::Active;
        }
        company.updated_at = now;

        if let Some(pool) = &self.state.db_pool {
            crate::db::profiles::insert(pool, &profile).await?;
            crate::db::companies::update(pool, &company).await?;
        }

        self.state.profiles.insert(company_id, profile.clone());
        self.state.companies.insert(company_id, company);

        tracing::info!(company_id = %company_id, "company onboarding recorded");
        Ok(profile)
    }

    /// Compose the company's registration identity with its onboarding
    /// profile.
    pub fn company_profile(
        &self,
        company_id: CompanyId,
    ) -> Result<CompanyProfileView, ServiceError> {
        let company = self
            .state
            .companies
            .get(&company_id)
            .ok_or(ServiceError::CompanyNotFound(*company_id.as_uuid()))?;
        let profile = self
            .state
            .profiles
            .get(&company_id)
            .ok_or(ServiceError::ProfileNotFound(*company_id.as_uuid()))?;
        Ok(CompanyProfileView::compose(company, profile))
    }

    /// Apply a partial update to the company and its profile.
    ///
    /// Only provided fields change; `name` updates the company record, the
    /// rest the profile. An empty request is a valid no-op and returns the
    /// current view without touching storage.
    pub async fn update_company_profile(
        &self,
        company_id: CompanyId,
        request: UpdateCompanyProfileRequest,
    ) -> Result<CompanyProfileView, ServiceError> {
        let mut company = self
            .state
            .companies
            .get(&company_id)
            .ok_or(ServiceError::CompanyNotFound(*company_id.as_uuid()))?;
        let mut profile = self
            .state
            .profiles
            .get(&company_id)
            .ok_or(ServiceError::ProfileNotFound(*company_id.as_uuid()))?;

        let mut company_changed = false;
        let mut profile_changed = false;

        if let Some(name) = request.name {
            company.name = name.trim().to_string();
            company_changed = true;
        }
        if let Some(industry) = request.industry {
            profile.industry = industry.trim().to_string();
            profile_changed = true;
        }
        if let Some(location) = request.location {
            profile.location = location.trim().to_string();
            profile_changed = true;
        }
        if let Some(company_size) = request.company_size {
            profile.company_size = company_size;
            profile_changed = true;
        }
        if let Some(website) = request.website {
            profile.website = normalize_optional(Some(website));
            profile_changed = true;
        }
        if let Some(logo_url) = request.logo_url {
            profile.logo_url = normalize_optional(Some(logo_url));
            profile_changed = true;
        }
        if let Some(description) = request.description {
            profile.description = normalize_optional(Some(description));
            profile_changed = true;
        }
        if let Some(phone) = request.phone {
            profile.phone = normalize_optional(Some(phone));
            profile_changed = true;
        }

        if !company_changed && !profile_changed {
            return Ok(CompanyProfileView::compose(company, profile));
        }

        let now = Utc::now();
        if company_changed {
            company.updated_at = now;
        }
        if profile_changed {
            profile.updated_at = now;
        }

        if let Some(pool) = &self.state.db_pool {
            if profile_changed {
                crate::db::profiles::update(pool, &profile).await?;
            }
            if company_changed {
                crate::db::companies::update(pool, &company).await?;
            }
        }

        if profile_changed {
            self.state.profiles.insert(company_id, profile.clone());
        }
        if company_changed {
            self.state.companies.insert(company_id, company.clone());
        }

        tracing::info!(company_id = %company_id, "company profile updated");
        Ok(CompanyProfileView::compose(company, profile))
    }
}

/// Trim an optional field, mapping blank values to `None`.
fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
