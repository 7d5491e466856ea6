//! # Success Envelope
//!
//! Uniform wrapper for all 2xx responses across the API surface.
//! Every successful handler returns `{ success, data, message, statusCode }`
//! so clients can branch on `success` without inspecting HTTP status codes.
//! The error-side counterpart is [`ErrorBody`](crate::error::ErrorBody).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Uniform success response envelope.
///
/// The HTTP status line always matches the `statusCode` field in the body.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Always `true`.
    pub success: bool,
    /// Response payload.
    pub data: T,
    /// Human-readable outcome message.
    pub message: String,
    /// HTTP status code, duplicated in the body.
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a payload in a `200 OK` envelope.
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self::with_status(data, message, StatusCode::OK)
    }

    /// Wrap a payload in a `201 Created` envelope.
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self::with_status(data, message, StatusCode::CREATED)
    }

    /// Wrap a payload with an explicit status code.
    pub fn with_status(data: T, message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
            status_code: status.as_u16(),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}
