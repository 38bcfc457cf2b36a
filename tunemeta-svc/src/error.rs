//! Error types for tunemeta-svc HTTP handlers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::StoreError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// No stored row and no catalog match (404)
    #[error("Song not found for title: {title}, artist: {artist}")]
    SongNotFound { title: String, artist: String },

    /// Song store lookup failed (500)
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::SongNotFound { title, artist } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "Song not found",
                    "title": title,
                    "artist": artist,
                }),
            ),
            ApiError::Store(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "Database error",
                    "message": err.to_string(),
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
