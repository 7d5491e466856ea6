//! # API Error Handling
//!
//! The platform error envelope plus the application error type shared by
//! every handler. All failures serialize to the same flat JSON body:
//!
//! ```json
//! {
//!   "success": false,
//!   "message": "Validation failed",
//!   "errors": { "industry": ["must not be empty"] },
//!   "statusCode": 422
//! }
//! ```
//!
//! `errors` is omitted when a failure carries no field-level detail.
//! Internal failures never leak their cause to clients; the true error is
//! logged and the body says "An internal error occurred".

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use company_core::FieldErrors;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::service::ServiceError;

// -- Wire envelope ------------------------------------------------------------

/// JSON body returned for every failed request.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// Human-readable description of the failure.
    pub message: String,
    /// Per-field validation messages, omitted when the failure has none.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub errors: Option<FieldErrors>,
    /// HTTP status code, mirrored into the body for client convenience.
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

impl ErrorBody {
    /// Build an envelope with no field errors.
    pub fn new(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: None,
            status_code: status.as_u16(),
        }
    }
}

// -- Application error --------------------------------------------------------

/// Application-level errors returned by route handlers.
///
/// Each variant maps to a fixed HTTP status; the response body is always an
/// [`ErrorBody`].
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource does not exist (404).
    #[error("{0}")]
    NotFound(String),

    /// Request payload failed validation (422).
    #[error("{message}")]
    Validation {
        message: String,
        errors: Option<FieldErrors>,
    },

    /// Request was malformed or rejected by business rules (400).
    #[error("{message}")]
    BadRequest {
        message: String,
        errors: Option<FieldErrors>,
    },

    /// Missing or invalid credentials (401).
    #[error("{0}")]
    Unauthorized(String),

    /// Request conflicts with the current resource state (409).
    #[error("{0}")]
    Conflict(String),

    /// Unexpected internal failure (500). The message is logged, never
    /// returned to the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Internal(_) = &self {
            tracing::error!(error = %self, "internal server error");
        }
        let (message, errors) = match self {
            Self::Internal(_) => ("An internal error occurred".to_string(), None),
            Self::Validation { message, errors } | Self::BadRequest { message, errors } => {
                (message, errors)
            }
            other => (other.to_string(), None),
        };

        let body = ErrorBody {
            success: false,
            message,
            errors,
            status_code: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

/// Natural HTTP mapping for service failures.
///
/// This is the propagation path used by the profile endpoints. The
/// onboarding endpoint does not use it; that handler flattens every service
/// failure into a 400 response itself.
impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match &err {
            ServiceError::CompanyNotFound(_) | ServiceError::ProfileNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            ServiceError::AlreadyOnboarded(_) => Self::Conflict(err.to_string()),
            ServiceError::Invalid(errors) => Self::Validation {
                message: err.to_string(),
                errors: Some(errors.clone()),
            },
            ServiceError::Storage(detail) => Self::Internal(detail.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use uuid::Uuid;

    async fn response_parts(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }

    fn field_errors(field: &str, message: &str) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        errors
    }

    // -- Envelope serialization -----------------------------------------------

    #[test]
    fn error_body_serializes_flat_envelope() {
        let mut errors = FieldErrors::new();
        errors.add("industry", "must not be empty");
        let body = ErrorBody {
            success: false,
            message: "Validation failed".to_string(),
            errors: Some(errors),
            status_code: 422,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Validation failed");
        assert_eq!(json["errors"]["industry"][0], "must not be empty");
        assert_eq!(json["statusCode"], 422);
    }

    #[test]
    fn error_body_omits_errors_when_absent() {
        let body = ErrorBody::new("nope", StatusCode::NOT_FOUND);
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("errors").is_none());
        assert_eq!(json["statusCode"], 404);
    }

    // -- Status mapping -------------------------------------------------------

    #[tokio::test]
    async fn not_found_maps_to_404() {
        let (status, json) = response_parts(AppError::NotFound("Company not found".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Company not found");
        assert_eq!(json["statusCode"], 404);
        assert!(json.get("errors").is_none());
    }

    #[tokio::test]
    async fn validation_maps_to_422_with_field_errors() {
        let err = AppError::Validation {
            message: "Validation failed".to_string(),
            errors: Some(field_errors("email", "must be a valid email address")),
        };
        let (status, json) = response_parts(err).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["message"], "Validation failed");
        assert_eq!(json["errors"]["email"][0], "must be a valid email address");
    }

    #[tokio::test]
    async fn bad_request_carries_message_and_errors_verbatim() {
        let err = AppError::BadRequest {
            message: "Company has already completed onboarding".to_string(),
            errors: Some(field_errors("industry", "must not be empty")),
        };
        let (status, json) = response_parts(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Company has already completed onboarding");
        assert_eq!(json["errors"]["industry"][0], "must not be empty");
        assert_eq!(json["statusCode"], 400);
    }

    #[tokio::test]
    async fn bad_request_without_errors_omits_field() {
        let err = AppError::BadRequest {
            message: "malformed body".to_string(),
            errors: None,
        };
        let (status, json) = response_parts(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json.get("errors").is_none());
    }

    #[tokio::test]
    async fn unauthorized_maps_to_401() {
        let (status, json) =
            response_parts(AppError::Unauthorized("invalid session token".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["message"], "invalid session token");
    }

    #[tokio::test]
    async fn conflict_maps_to_409() {
        let (status, json) = response_parts(AppError::Conflict("already onboarded".into())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["statusCode"], 409);
    }

    #[tokio::test]
    async fn internal_error_hides_detail_from_client() {
        let err = AppError::Internal("pool timed out while acquiring connection".to_string());
        let (status, json) = response_parts(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["message"], "An internal error occurred");
        assert_eq!(
            json["message"].as_str().unwrap().contains("pool"),
            false,
            "internal detail must not reach the client"
        );
    }

    // -- Service error conversion ---------------------------------------------

    #[test]
    fn service_not_found_converts_to_404() {
        let err: AppError = ServiceError::CompanyNotFound(Uuid::new_v4()).into();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.to_string(), "Company not found");

        let err: AppError = ServiceError::ProfileNotFound(Uuid::new_v4()).into();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.to_string(), "Company profile not found");
    }

    #[test]
    fn service_already_onboarded_converts_to_conflict() {
        let err: AppError = ServiceError::AlreadyOnboarded(Uuid::new_v4()).into();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(err.to_string(), "Company has already completed onboarding");
    }

    #[test]
    fn service_invalid_converts_to_validation() {
        let errors = field_errors("phone", "must be a valid phone number");
        let err: AppError = ServiceError::Invalid(errors).into();
        match err {
            AppError::Validation { message, errors } => {
                assert_eq!(message, "Validation failed");
                let errors = errors.unwrap();
                let json = serde_json::to_value(&errors).unwrap();
                assert_eq!(json["phone"][0], "must be a valid phone number");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn service_storage_converts_to_hidden_internal() {
        let err: AppError = ServiceError::Storage("connection reset".to_string()).into();
        match &err {
            AppError::Internal(detail) => assert_eq!(detail, "connection reset"),
            other => panic!("expected Internal, got {other:?}"),
        }
    }
}
