//! Request spans for the HTTP layer
//!
//! A request span joins the caller's trace when a W3C `traceparent` header is
//! present, and records the response status once the handler has finished.

use axum::body::Body;
use axum::http::{HeaderMap, Request, Response};
use opentelemetry::propagation::Extractor;
use std::time::Duration;
use tracing::field::Empty;
use tracing::{debug, info_span, Span};
use tracing_opentelemetry::OpenTelemetrySpanExt;
use tunemeta_common::attributes::{HTTP_RESPONSE_STATUS_CODE, OTEL_STATUS_CODE};

struct HeaderExtractor<'a>(&'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|key| key.as_str()).collect()
    }
}

/// `TraceLayer` span factory
pub fn make_request_span(request: &Request<Body>) -> Span {
    let span = info_span!(
        "http_request",
        otel.kind = "server",
        http.request.method = %request.method(),
        url.path = %request.uri().path(),
        http.response.status_code = Empty,
        otel.status_code = Empty
    );

    let parent = opentelemetry::global::get_text_map_propagator(|propagator| {
        propagator.extract(&HeaderExtractor(request.headers()))
    });
    span.set_parent(parent);

    span
}

/// `TraceLayer` response hook; 5xx responses mark the span as failed
pub fn record_response(response: &Response<Body>, latency: Duration, span: &Span) {
    let status = response.status();
    span.record(HTTP_RESPONSE_STATUS_CODE, status.as_u16());
    if status.is_server_error() {
        span.record(OTEL_STATUS_CODE, "ERROR");
    }

    debug!(
        status = status.as_u16(),
        latency_ms = latency.as_millis() as u64,
        "Finished request"
    );
}
