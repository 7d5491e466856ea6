//! # Request Extraction Helpers
//!
//! Wrappers around axum's `Json` extractor that normalize rejection handling.
//! Handlers take the raw `Result<Json<T>, JsonRejection>` so a malformed body
//! reaches the handler instead of short-circuiting with axum's default
//! rejection format, then pass it through these helpers.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use company_core::FieldErrors;

use crate::error::AppError;

/// Request payloads that carry their own field-level validation rules.
pub trait Validate {
    /// Check the payload, collecting every violation into [`FieldErrors`].
    fn validate(&self) -> Result<(), FieldErrors>;
}

/// Unwrap a JSON extraction, mapping malformed bodies to a 400.
pub fn extract_json<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(AppError::BadRequest {
            message: rejection.body_text(),
            errors: None,
        }),
    }
}

/// Unwrap a JSON extraction and run the payload's validation rules.
///
/// Malformed bodies map to 400; rule violations map to 422 with per-field
/// messages.
pub fn extract_validated_json<T: Validate>(
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(payload)?;
    value.validate().map_err(|errors| AppError::Validation {
        message: "Validation failed".to_string(),
        errors: Some(errors),
    })?;
    Ok(value)
}
