//! Collaborator interfaces consumed by the resolver
//!
//! The resolver only sees these traits. Production wiring uses
//! [`crate::db::songs::SqliteSongStore`] and
//! [`crate::services::musicbrainz_client::MusicBrainzClient`]; tests plug in fakes.

use crate::models::{Candidate, SongRecord};
use async_trait::async_trait;
use thiserror::Error;

/// Song store failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Catalog failures; never escape [`CatalogGateway::search`]
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Local cache of resolved songs
#[async_trait]
pub trait SongStore: Send + Sync {
    /// Find the row for (title, artist), compared case-insensitively
    async fn lookup(&self, title: &str, artist: &str) -> Result<Option<SongRecord>, StoreError>;

    /// Insert `record`; an existing row for the same key is left untouched
    /// and the call still succeeds
    async fn upsert(&self, record: &SongRecord) -> Result<(), StoreError>;
}

/// External metadata catalog
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// Search recordings matching both title and artist, in relevance order
    ///
    /// Transport and parse failures are logged and reported as no candidates.
    async fn search(&self, title: &str, artist: &str) -> Vec<Candidate>;
}
