//! # Field-Level Error Map
//!
//! The shape of the `errors` payload carried by the platform's error
//! envelope: an ordered map from field name to the list of rule violations
//! for that field.
//!
//! A `BTreeMap` keeps serialization deterministic — the same failures
//! always produce the same JSON, which keeps error bodies diffable in
//! logs and stable in tests.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Ordered map of `field name → violation messages`.
///
/// Serializes as a plain JSON object:
///
/// ```json
/// { "industry": ["must not be empty"], "website": ["must be a valid http(s) URL"] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Create an empty error map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation message against a field.
    ///
    /// Multiple messages for the same field accumulate in insertion order.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Whether any violations have been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with at least one violation.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The violation messages recorded for a field, if any.
    pub fn messages_for(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Iterate over `(field, messages)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_empty() {
        let errors = FieldErrors::new();
        assert!(errors.is_empty());
        assert_eq!(errors.len(), 0);
    }

    #[test]
    fn add_records_message_under_field() {
        let mut errors = FieldErrors::new();
        errors.add("industry", "must not be empty");
        assert!(!errors.is_empty());
        assert_eq!(
            errors.messages_for("industry"),
            Some(&["must not be empty".to_string()][..])
        );
    }

    #[test]
    fn add_accumulates_messages_in_order() {
        let mut errors = FieldErrors::new();
        errors.add("phone", "must not be empty");
        errors.add("phone", "must be a valid phone number");
        let messages = errors.messages_for("phone").unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], "must not be empty");
        assert_eq!(messages[1], "must be a valid phone number");
    }

    #[test]
    fn len_counts_fields_not_messages() {
        let mut errors = FieldErrors::new();
        errors.add("a", "one");
        errors.add("a", "two");
        errors.add("b", "three");
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn serializes_as_plain_object() {
        let mut errors = FieldErrors::new();
        errors.add("website", "must be a valid http(s) URL");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "website": ["must be a valid http(s) URL"] })
        );
    }

    #[test]
    fn serialization_is_field_ordered() {
        let mut errors = FieldErrors::new();
        errors.add("zebra", "z");
        errors.add("alpha", "a");
        let json = serde_json::to_string(&errors).unwrap();
        let alpha = json.find("alpha").unwrap();
        let zebra = json.find("zebra").unwrap();
        assert!(alpha < zebra, "fields must serialize in sorted order");
    }

    #[test]
    fn display_joins_field_and_message() {
        let mut errors = FieldErrors::new();
        errors.add("industry", "must not be empty");
        errors.add("website", "must be a valid http(s) URL");
        let rendered = errors.to_string();
        assert_eq!(
            rendered,
            "industry: must not be empty; website: must be a valid http(s) URL"
        );
    }

    #[test]
    fn deserialize_roundtrip() {
        let mut errors = FieldErrors::new();
        errors.add("name", "must not be empty");
        let json = serde_json::to_string(&errors).unwrap();
        let back: FieldErrors = serde_json::from_str(&json).unwrap();
        assert_eq!(errors, back);
    }
}
