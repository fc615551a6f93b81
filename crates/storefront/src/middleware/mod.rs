//! HTTP middleware for the mock API.
//!
//! # Layer Order (outermost first)
//!
//! 1. Sentry layers (added in `main`)
//! 2. CORS
//! 3. `TraceLayer` with [`make_span`] opens the `http_request` span
//! 4. [`request_id_middleware`] fills the span's `request_id`

pub mod request_id;

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use tower_http::trace::{DefaultOnResponse, OnResponse};
use tracing::Span;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};

/// `http_request` span for `TraceLayer::make_span_with`.
pub fn make_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = tracing::field::Empty,
        status = tracing::field::Empty,
        latency_ms = tracing::field::Empty,
    )
}

/// Record status and latency for `TraceLayer::on_response`.
pub fn on_response(response: &Response<Body>, latency: Duration, span: &Span) {
    span.record("status", response.status().as_u16());
    span.record(
        "latency_ms",
        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
    );
    DefaultOnResponse::default().on_response(response, latency, span);
}
