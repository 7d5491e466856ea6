//! # Request Metrics
//!
//! Lightweight request metrics using atomic counters. The counters are
//! served as JSON by the unauthenticated `/metrics` endpoint.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use serde::Serialize;

/// Shared request/error counters.
///
/// Clones share the same counters, so one instance can live in the router
/// extensions while another serves the `/metrics` endpoint.
#[derive(Debug, Clone, Default)]
pub struct ApiMetrics {
    counters: Arc<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    requests: AtomicU64,
    errors: AtomicU64,
}

impl ApiMetrics {
    /// Create a new metrics instance with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one completed request. 4xx and 5xx responses also count as
    /// errors.
    pub fn record(&self, status: StatusCode) {
        self.counters.requests.fetch_add(1, Ordering::Relaxed);
        if status.is_client_error() || status.is_server_error() {
            self.counters.errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Return current request count.
    pub fn requests(&self) -> u64 {
        self.counters.requests.load(Ordering::Relaxed)
    }

    /// Return current error count.
    pub fn errors(&self) -> u64 {
        self.counters.errors.load(Ordering::Relaxed)
    }

    /// Point-in-time view of the counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.requests(),
            errors: self.errors(),
        }
    }
}

/// Serializable counter values returned by the metrics endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub errors: u64,
}

/// Middleware that counts every completed request against the
/// [`ApiMetrics`] found in the request extensions, if any.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();

    let response = next.run(request).await;

    if let Some(metrics) = metrics {
        metrics.record(response.status());
    }

    response
}
