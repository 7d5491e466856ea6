//! # Company Onboarding and Profile API
//!
//! Endpoints for the authenticated company: submit the onboarding profile,
//! read the composed profile view, and apply partial updates. The session
//! guard resolves the acting company before any handler runs, so handlers
//! receive [`CurrentCompany`] and dispatch exactly one service call with
//! its id.
//!
//! ## Error shape
//!
//! The onboarding endpoint flattens every service failure to a 400 carrying
//! the failure's message and field errors verbatim. The two profile
//! endpoints propagate service failures to their natural status codes
//! instead. Clients depend on both behaviors.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use company_core::{http_url, max_len, non_empty, phone, FieldErrors};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::CurrentCompany;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::response::ApiResponse;
use crate::service::{CompanyProfileView, CompanyService, ServiceError};
use crate::state::{AppState, CompanyProfileRecord, CompanySize};

/// Onboarding profile submission.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OnboardingRequest {
    /// Industry the company operates in.
    pub industry: String,
    /// Primary operating location.
    pub location: String,
    /// Self-declared size band.
    pub company_size: CompanySize,
    /// Public website, http(s) only.
    pub website: Option<String>,
    /// Free-form company description.
    pub description: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Logo image URL, http(s) only.
    pub logo_url: Option<String>,
}

impl Validate for OnboardingRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if let Err(e) = non_empty(&self.industry) {
            errors.add("industry", e.to_string());
        } else if let Err(e) = max_len(&self.industry, 120) {
            errors.add("industry", e.to_string());
        }

        if let Err(e) = non_empty(&self.location) {
            errors.add("location", e.to_string());
        } else if let Err(e) = max_len(&self.location, 160) {
            errors.add("location", e.to_string());
        }

        if let Some(website) = &self.website {
            if let Err(e) = http_url(website) {
                errors.add("website", e.to_string());
            }
        }

        if let Some(description) = &self.description {
            if let Err(e) = max_len(description, 2000) {
                errors.add("description", e.to_string());
            }
        }

        if let Some(value) = &self.phone {
            if let Err(e) = phone(value) {
                errors.add("phone", e.to_string());
            }
        }

        if let Some(logo_url) = &self.logo_url {
            if let Err(e) = http_url(logo_url) {
                errors.add("logo_url", e.to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Partial update for the company and its profile.
///
/// Every field is optional; `name` targets the company record, the rest the
/// onboarding profile. An empty body is accepted and changes nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateCompanyProfileRequest {
    /// New company display name.
    pub name: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub company_size: Option<CompanySize>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub logo_url: Option<String>,
}

impl Validate for UpdateCompanyProfileRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if let Some(name) = &self.name {
            if let Err(e) = non_empty(name) {
                errors.add("name", e.to_string());
            } else if let Err(e) = max_len(name, 160) {
                errors.add("name", e.to_string());
            }
        }

        if let Some(industry) = &self.industry {
            if let Err(e) = non_empty(industry) {
                errors.add("industry", e.to_string());
            } else if let Err(e) = max_len(industry, 120) {
                errors.add("industry", e.to_string());
            }
        }

        if let Some(location) = &self.location {
            if let Err(e) = non_empty(location) {
                errors.add("location", e.to_string());
            } else if let Err(e) = max_len(location, 160) {
                errors.add("location", e.to_string());
            }
        }

        if let Some(website) = &self.website {
            if let Err(e) = http_url(website) {
                errors.add("website", e.to_string());
            }
        }

        if let Some(description) = &self.description {
            if let Err(e) = max_len(description, 2000) {
                errors.add("description", e.to_string());
            }
        }

        if let Some(value) = &self.phone {
            if let Err(e) = phone(value) {
                errors.add("phone", e.to_string());
            }
        }

        if let Some(logo_url) = &self.logo_url {
            if let Err(e) = http_url(logo_url) {
                errors.add("logo_url", e.to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Build the company router. Every route requires an authenticated company.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/onboarding", post(onboarding))
        .route("/profile", get(get_profile).patch(update_profile))
}

/// POST /onboarding — Submit the company's onboarding profile.
///
/// Service failures do not propagate from this handler: every one is
/// flattened to a 400 carrying the failure's message and field errors
/// verbatim, even when its natural mapping would be conflict or internal.
/// The profile endpoints below propagate instead; clients depend on both
/// behaviors.
#[utoipa::path(
    post,
    path = "/onboarding",
    request_body = OnboardingRequest,
    responses(
        (status = 201, description = "Company onboarding successful", body = CompanyProfileRecord),
        (status = 400, description = "Onboarding rejected", body = crate::error::ErrorBody),
        (status = 401, description = "Missing or invalid session", body = crate::error::ErrorBody),
        (status = 422, description = "Payload failed validation", body = crate::error::ErrorBody),
    ),
    tag = "company"
)]
async fn onboarding(
    State(state): State<AppState>,
    CurrentCompany { company }: CurrentCompany,
    body: Result<Json<OnboardingRequest>, JsonRejection>,
) -> Result<ApiResponse<CompanyProfileRecord>, AppError> {
    let request = extract_validated_json(body)?;

    match CompanyService::new(&state)
        .onboarding(company.id, request)
        .await
    {
        Ok(profile) => Ok(ApiResponse::created(
            profile,
            "Company onboarding successful",
        )),
        Err(err) => {
            if let ServiceError::Storage(detail) = &err {
                tracing::error!(
                    company_id = %company.id,
                    error = %detail,
                    "onboarding failed on storage; returning 400"
                );
            }
            Err(AppError::BadRequest {
                message: err.to_string(),
                errors: err.field_errors().cloned(),
            })
        }
    }
}

/// GET /profile — Retrieve the company's composed profile view.
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "Company profile retrieved successfully", body = CompanyProfileView),
        (status = 401, description = "Missing or invalid session", body = crate::error::ErrorBody),
        (status = 404, description = "Company or profile not found", body = crate::error::ErrorBody),
    ),
    tag = "company"
)]
async fn get_profile(
    State(state): State<AppState>,
    CurrentCompany { company }: CurrentCompany,
) -> Result<ApiResponse<CompanyProfileView>, AppError> {
    let view = CompanyService::new(&state).company_profile(company.id)?;
    Ok(ApiResponse::ok(view, "Company profile retrieved successfully"))
}

/// PATCH /profile — Apply a partial update to the company and its profile.
#[utoipa::path(
    patch,
    path = "/profile",
    request_body = UpdateCompanyProfileRequest,
    responses(
        (status = 200, description = "Company profile updated successfully", body = CompanyProfileView),
        (status = 401, description = "Missing or invalid session", body = crate::error::ErrorBody),
        (status = 404, description = "Company or profile not found", body = crate::error::ErrorBody),
        (status = 422, description = "Payload failed validation", body = crate::error::ErrorBody),
    ),
    tag = "company"
)]
async fn update_profile(
    State(state): State<AppState>,
    CurrentCompany { company }: CurrentCompany,
    body: Result<Json<UpdateCompanyProfileRequest>, JsonRejection>,
) -> Result<ApiResponse<CompanyProfileView>, AppError> {
    let request = extract_validated_json(body)?;
    let view = CompanyService::new(&state)
        .update_company_profile(company.id, request)
        .await?;
    Ok(ApiResponse::ok(view, "Company profile updated successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_onboarding() -> OnboardingRequest {
        OnboardingRequest {
            industry: "Freight".to_string(),
            location: "Rotterdam, NL".to_string(),
            company_size: CompanySize::Medium,
            website: Some("https://acme.example".to_string()),
            description: Some("Cross-dock logistics".to_string()),
            phone: Some("+31 10 123 4567".to_string()),
            logo_url: Some("https://acme.example/logo.png".to_string()),
        }
    }

    #[test]
    fn onboarding_request_accepts_valid_payload() {
        assert!(valid_onboarding().validate().is_ok());
    }

    #[test]
    fn onboarding_request_accepts_omitted_optionals() {
        let request = OnboardingRequest {
            website: None,
            description: None,
            phone: None,
            logo_url: None,
            ..valid_onboarding()
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn onboarding_request_requires_industry_and_location() {
        let request = OnboardingRequest {
            industry: "   ".to_string(),
            location: String::new(),
            ..valid_onboarding()
        };
        let errors = request.validate().expect_err("blank fields must fail");
        assert_eq!(
            errors.messages_for("industry"),
            Some(&["must not be empty".to_string()][..])
        );
        assert_eq!(
            errors.messages_for("location"),
            Some(&["must not be empty".to_string()][..])
        );
    }

    #[test]
    fn onboarding_request_bounds_field_lengths() {
        let request = OnboardingRequest {
            industry: "x".repeat(121),
            location: "y".repeat(161),
            description: Some("z".repeat(2001)),
            ..valid_onboarding()
        };
        let errors = request.validate().expect_err("oversized fields must fail");
        assert_eq!(
            errors.messages_for("industry"),
            Some(&["must not exceed 120 characters".to_string()][..])
        );
        assert_eq!(
            errors.messages_for("location"),
            Some(&["must not exceed 160 characters".to_string()][..])
        );
        assert_eq!(
            errors.messages_for("description"),
            Some(&["must not exceed 2000 characters".to_string()][..])
        );
    }

    #[test]
    fn onboarding_request_validates_urls_and_phone() {
        let request = OnboardingRequest {
            website: Some("ftp://acme.example".to_string()),
            logo_url: Some("not a url".to_string()),
            phone: Some("call me".to_string()),
            ..valid_onboarding()
        };
        let errors = request.validate().expect_err("bad formats must fail");
        assert!(errors.messages_for("website").is_some());
        assert!(errors.messages_for("logo_url").is_some());
        assert!(errors.messages_for("phone").is_some());
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn onboarding_request_deserializes_minimal_payload() {
        let request: OnboardingRequest = serde_json::from_value(json!({
            "industry": "Freight",
            "location": "Rotterdam",
            "company_size": "small"
        }))
        .expect("minimal payload parses");
        assert_eq!(request.company_size, CompanySize::Small);
        assert!(request.website.is_none());
        assert!(request.phone.is_none());
    }

    #[test]
    fn update_request_empty_is_valid() {
        assert!(UpdateCompanyProfileRequest::default().validate().is_ok());

        let request: UpdateCompanyProfileRequest =
            serde_json::from_value(json!({})).expect("empty body parses");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn update_request_rejects_blank_or_oversized_name() {
        let request = UpdateCompanyProfileRequest {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        let errors = request.validate().expect_err("blank name must fail");
        assert_eq!(
            errors.messages_for("name"),
            Some(&["must not be empty".to_string()][..])
        );

        let request = UpdateCompanyProfileRequest {
            name: Some("n".repeat(161)),
            ..Default::default()
        };
        let errors = request.validate().expect_err("oversized name must fail");
        assert_eq!(
            errors.messages_for("name"),
            Some(&["must not exceed 160 characters".to_string()][..])
        );
    }

    #[test]
    fn update_request_validates_provided_fields_only() {
        let request = UpdateCompanyProfileRequest {
            website: Some("gopher://old.example".to_string()),
            phone: Some("not-a-phone!".to_string()),
            ..Default::default()
        };
        let errors = request.validate().expect_err("bad formats must fail");
        assert_eq!(errors.len(), 2);
        assert!(errors.messages_for("industry").is_none());
        assert!(errors.messages_for("name").is_none());
    }
}
