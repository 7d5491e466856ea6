//! # Input Validators
//!
//! Field-agnostic validation checks used by request DTOs across the
//! platform. Each check returns `Result<(), ValidationError>`; callers
//! accumulate violations into a [`FieldErrors`](crate::FieldErrors) map
//! keyed by field name.
//!
//! The checks are deliberately structural, not exhaustive: email validation
//! confirms a `local@domain` shape with a dotted domain rather than chasing
//! the full RFC 5321 grammar, and phone validation accepts the common
//! international formatting characters around 7–15 significant digits.

use url::Url;

use crate::error::ValidationError;

/// Require a non-empty value after trimming whitespace.
pub fn non_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty);
    }
    Ok(())
}

/// Require the value to be at most `max` characters long.
///
/// Counts Unicode scalar values, not bytes, so multi-byte names are not
/// penalized.
pub fn max_len(value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { max });
    }
    Ok(())
}

/// Structural email check: exactly one `@`, non-empty local part, and a
/// dotted domain with non-empty labels. No whitespace anywhere.
pub fn email(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || value.len() > 254 || value.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidEmail);
    }

    let mut parts = value.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = match parts.next() {
        Some(d) => d,
        None => return Err(ValidationError::InvalidEmail),
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ValidationError::InvalidEmail);
    }

    // Domain must have at least two non-empty dot-separated labels.
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(())
}

/// Require an absolute `http` or `https` URL with a host.
pub fn http_url(value: &str) -> Result<(), ValidationError> {
    let parsed = Url::parse(value.trim()).map_err(|_| ValidationError::InvalidUrl)?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ValidationError::InvalidUrl);
    }
    if parsed.host_str().is_none() {
        return Err(ValidationError::InvalidUrl);
    }
    Ok(())
}

/// Plausibility check for phone numbers.
///
/// Accepts an optional leading `+` and the common formatting characters
/// (spaces, dashes, dots, parentheses); requires 7–15 significant digits
/// and nothing else.
pub fn phone(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    let rest = value.strip_prefix('+').unwrap_or(value);

    let mut digits = 0usize;
    for c in rest.chars() {
        match c {
            '0'..='9' => digits += 1,
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => return Err(ValidationError::InvalidPhone),
        }
    }

    if !(7..=15).contains(&digits) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(())
}
