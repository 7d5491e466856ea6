//! # Validation Error Hierarchy
//!
//! Structured rule violations for input validation, built with `thiserror`.
//!
//! Messages are complete sentences without the field name — the field is
//! the key in the surrounding [`FieldErrors`](crate::FieldErrors) map, so
//! a violation reads as `"website": ["must be a valid http(s) URL"]`.

use thiserror::Error;

/// A single validation rule violation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The value is empty or whitespace-only but the field is required.
    #[error("must not be empty")]
    Empty,

    /// The value exceeds the maximum permitted length.
    #[error("must not exceed {max} characters")]
    TooLong {
        /// Maximum permitted length in characters.
        max: usize,
    },

    /// The value is not a structurally valid email address.
    #[error("must be a valid email address")]
    InvalidEmail,

    /// The value is not an absolute http(s) URL.
    #[error("must be a valid http(s) URL")]
    InvalidUrl,

    /// The value is not a plausible phone number.
    #[error("must be a valid phone number")]
    InvalidPhone,
}
