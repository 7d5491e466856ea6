//! # Request/Response Tracing
//!
//! `tower_http::trace::TraceLayer` configuration shared by the router
//! assembly. Spans open at INFO with method and URI; completions log at
//! DEBUG with millisecond latency, so a default `info` filter stays quiet
//! per-request while `debug` shows the full request lifecycle.

use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::Level;

/// Build the request-tracing layer for the company API.
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::DEBUG)
                .latency_unit(LatencyUnit::Millis),
        )
}
