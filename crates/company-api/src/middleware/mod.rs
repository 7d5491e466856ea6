//! # HTTP Middleware
//!
//! Cross-cutting request middleware for the authenticated API router:
//!
//! - `metrics` — request/error counters exposed as JSON at `/metrics`.
//! - `rate_limit` — token-bucket limiting keyed by the authenticated
//!   company.
//! - `tracing_layer` — `tower_http` request tracing.

pub mod metrics;
pub mod rate_limit;
pub mod tracing_layer;
