#![deny(missing_docs)]

//! # company-core — Foundational Types for the Company Platform
//!
//! This crate defines the foundational types the other workspace crates
//! depend on. It has no internal crate dependencies — only `serde`,
//! `serde_json`, `thiserror`, `uuid`, and `url` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** Every identifier is a
//!    distinct type. You cannot pass a [`SessionId`] where a [`CompanyId`]
//!    is expected.
//!
//! 2. **[`FieldErrors`] is the sole shape for field-level failures.** Every
//!    validation path in the platform accumulates into the same ordered
//!    field → messages map, so error envelopes serialize identically
//!    everywhere.
//!
//! 3. **[`ValidationError`] hierarchy.** Structured rule violations with
//!    `thiserror` — no `Box<dyn Error>`, no `.unwrap()` outside tests.

pub mod error;
pub mod field_errors;
pub mod identity;
pub mod validation;

// Re-export primary types at crate root for ergonomic imports.
pub use error::ValidationError;
pub use field_errors::FieldErrors;
pub use identity::{CompanyId, SessionId};
pub use validation::{email, http_url, max_len, non_empty, phone};
