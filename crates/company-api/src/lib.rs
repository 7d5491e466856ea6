//! # company-api — Axum API for Company Onboarding
//!
//! Session-authenticated HTTP API for company onboarding and profile
//! management. A company is registered out of band (see `company-admin`),
//! receives a bearer session token, submits its onboarding profile once,
//! and manages that profile afterwards.
//!
//! ## API Surface
//!
//! | Route         | Method | Module              | Behaviour                  |
//! |---------------|--------|---------------------|----------------------------|
//! | `/onboarding` | POST   | [`routes::company`] | Submit onboarding profile  |
//! | `/profile`    | GET    | [`routes::company`] | Read composed profile view |
//! | `/profile`    | PATCH  | [`routes::company`] | Partial profile update     |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → AuthMiddleware → RateLimitMiddleware → Handler
//! ```
//!
//! ## OpenAPI
//!
//! Auto-generated OpenAPI spec via utoipa derive macros at `/openapi.json`,
//! served behind the session guard.

pub mod auth;
pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;

use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::get;
use axum::{Extension, Json, Router};

use crate::middleware::metrics::{ApiMetrics, MetricsSnapshot};
use crate::middleware::rate_limit::{RateLimitConfig, RateLimiter};
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) and the metrics endpoint are mounted outside
/// the session guard so they remain accessible without credentials.
pub fn app(state: AppState) -> Router {
    let metrics = ApiMetrics::new();
    let limiter = RateLimiter::new(RateLimitConfig::default());

    // Session-guarded API routes.
    let api = Router::new()
        .merge(routes::company::router())
        .merge(openapi::router())
        .layer(from_fn(middleware::rate_limit::rate_limit_middleware))
        .layer(from_fn_with_state(state.clone(), auth::auth_middleware))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(middleware::tracing_layer::layer())
        .layer(Extension(metrics.clone()))
        .layer(Extension(limiter))
        .with_state(state);

    // Unauthenticated operational endpoints.
    let ops = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .route("/metrics", get(metrics_snapshot))
        .layer(Extension(metrics));

    Router::new().merge(ops).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}

/// GET /metrics — Current request/error counters as JSON.
async fn metrics_snapshot(Extension(metrics): Extension<ApiMetrics>) -> Json<MetricsSnapshot> {
    Json(metrics.snapshot())
}
