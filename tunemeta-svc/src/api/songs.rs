//! Song metadata endpoint
//!
//! `GET /songs/:title/:artist`

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::error::{ApiError, ApiResult};
use crate::models::SongRecord;
use crate::services::Resolution;
use crate::AppState;

/// GET /songs/:title/:artist
///
/// 200 with the record, 404 when nothing matches, 500 when the store fails.
pub async fn get_song(
    State(state): State<AppState>,
    Path((title, artist)): Path<(String, String)>,
) -> ApiResult<Json<SongRecord>> {
    match state.resolver.resolve(&title, &artist).await? {
        Resolution::Found(record) => Ok(Json(record)),
        Resolution::NotFound => Err(ApiError::SongNotFound { title, artist }),
    }
}

/// Build song routes
pub fn song_routes() -> Router<AppState> {
    Router::new().route("/songs/:title/:artist", get(get_song))
}
