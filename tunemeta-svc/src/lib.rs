//! tunemeta-svc library interface
//!
//! Resolves song metadata (album, year, duration, genre) for a title/artist
//! pair, using a local SQLite store in front of the MusicBrainz catalog.

pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod telemetry;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::services::Resolver;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(resolver: Resolver) -> Self {
        Self {
            resolver: Arc::new(resolver),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::song_routes())
        .merge(api::health_routes())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(telemetry::make_request_span)
                .on_response(telemetry::record_response),
        )
        .with_state(state)
}
