//! # Per-Company Rate Limiting
//!
//! Token-bucket rate limiter keyed by the authenticated company. The
//! middleware runs after the session guard, so the key is taken from the
//! [`CurrentCompany`] request extension; requests that arrive without one
//! share the `"anonymous"` bucket.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use parking_lot::RwLock;

use crate::auth::CurrentCompany;
use crate::error::ErrorBody;

/// Rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window.
    pub max_requests: u64,
    /// Window duration in seconds.
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 1000,
            window_secs: 60,
        }
    }
}

/// One company's active window: when it opened and how much of the
/// allowance is spent.
#[derive(Debug, Clone, Copy)]
struct Window {
    opened: Instant,
    used: u64,
}

impl Window {
    fn fresh(now: Instant) -> Self {
        Self { opened: now, used: 0 }
    }
}

/// Shared rate limiter state.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: Arc<RwLock<HashMap<String, Window>>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given config.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Check if a request under the given key should be allowed.
    fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.write();
        let window = windows
            .entry(key.to_string())
            .or_insert_with(|| Window::fresh(now));

        if now.duration_since(window.opened).as_secs() >= self.config.window_secs {
            *window = Window::fresh(now);
        }
        if window.used >= self.config.max_requests {
            return false;
        }
        window.used += 1;
        true
    }
}

/// Middleware that enforces per-company rate limits.
///
/// The rate limit key is the company id resolved by the session guard.
pub async fn rate_limit_middleware(request: Request, next: Next) -> Response {
    let limiter = request.extensions().get::<RateLimiter>().cloned();

    if let Some(limiter) = limiter {
        let key = request
            .extensions()
            .get::<CurrentCompany>()
            .map(|current| current.company.id.to_string())
            .unwrap_or_else(|| "anonymous".to_string());

        if !limiter.check(&key) {
            tracing::warn!(key = %key, "rate limit exceeded");
            let body = ErrorBody::new("rate limit exceeded", StatusCode::TOO_MANY_REQUESTS);
            return (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
        }
    }

    next.run(request).await
}
