//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI spec.
//! Serves at `/openapi.json` inside the authenticated router, so the spec
//! is only visible to holders of a valid session. Optionally includes
//! Swagger UI at `/swagger-ui` when the `swagger` feature is enabled.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the company API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Company Platform API",
        version = "0.1.0",
        description = "Session-authenticated company onboarding and profile management.",
        license(name = "Apache-2.0")
    ),
    paths(
        crate::routes::company::onboarding,
        crate::routes::company::get_profile,
        crate::routes::company::update_profile,
    ),
    components(schemas(
        // State record types
        crate::state::CompanyRecord,
        crate::state::CompanyStatus,
        crate::state::CompanyProfileRecord,
        crate::state::CompanySize,
        // Views
        crate::service::CompanyProfileView,
        // Error types
        crate::error::ErrorBody,
        // Company DTOs
        crate::routes::company::OnboardingRequest,
        crate::routes::company::UpdateCompanyProfileRequest,
    )),
    tags(
        (name = "company", description = "Company onboarding and profile management"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
///
/// Serves the OpenAPI JSON spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
