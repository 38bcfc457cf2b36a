//! Cache-aside song metadata resolution
//!
//! One pass per call, no retries:
//! 1. Store lookup (hit → return the row, catalog never consulted)
//! 2. Catalog search on miss (failures already downgraded to no candidates)
//! 3. Candidate selection (nothing selected → `NotFound`)
//! 4. Idempotent write-back, whose failure never changes the result
//!
//! Concurrent resolutions of the same unseen key may both reach step 4; the
//! store's unique key turns the second insert into a no-op.

use crate::models::SongRecord;
use crate::services::candidate_selector::select;
use crate::services::gateway::{CatalogGateway, SongStore, StoreError};
use std::sync::Arc;
use tracing::field::Empty;
use tracing::{debug, error, info, info_span, warn, Instrument, Span};
use tunemeta_common::attributes::{
    LOOKUP_OUTCOME, MEDIA_ALBUM_NAME, MEDIA_SONG_DURATION_MS, MEDIA_SONG_GENRE, MEDIA_SONG_YEAR,
    OTEL_STATUS_CODE, OTEL_STATUS_MESSAGE,
};

/// Terminal outcome of a successful resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(SongRecord),
    /// No store row and no usable catalog candidate
    NotFound,
}

/// When the write-back of a catalog result happens
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PersistMode {
    /// Await the upsert before returning
    #[default]
    Inline,
    /// Spawn the upsert and return immediately
    Background,
}

pub struct Resolver {
    store: Arc<dyn SongStore>,
    catalog: Arc<dyn CatalogGateway>,
    persist_mode: PersistMode,
}

impl Resolver {
    pub fn new(store: Arc<dyn SongStore>, catalog: Arc<dyn CatalogGateway>) -> Self {
        Self {
            store,
            catalog,
            persist_mode: PersistMode::default(),
        }
    }

    pub fn with_persist_mode(mut self, persist_mode: PersistMode) -> Self {
        self.persist_mode = persist_mode;
        self
    }

    /// Resolve metadata for (title, artist)
    ///
    /// Fails only when the store lookup itself fails.
    pub async fn resolve(&self, title: &str, artist: &str) -> Result<Resolution, StoreError> {
        // Field names mirror tunemeta_common::attributes
        let span = info_span!(
            "resolve_song",
            media.song.name = %title,
            media.artist.name = %artist,
            media.album.name = Empty,
            media.song.year = Empty,
            media.song.duration_ms = Empty,
            media.song.genre = Empty,
            lookup.outcome = Empty,
            otel.status_code = Empty,
            otel.status_message = Empty
        );

        self.resolve_in_span(title, artist).instrument(span).await
    }

    async fn resolve_in_span(&self, title: &str, artist: &str) -> Result<Resolution, StoreError> {
        let span = Span::current();

        let cached = self.store.lookup(title, artist).await.map_err(|e| {
            error!(error = %e, "Song store lookup failed");
            mark_error(&span, &e);
            e
        })?;

        if let Some(record) = cached {
            debug!("Song found in store");
            span.record(LOOKUP_OUTCOME, "cache_hit");
            record_song_fields(&span, &record);
            return Ok(Resolution::Found(record));
        }

        let candidates = self.catalog.search(title, artist).await;
        debug!(candidates = candidates.len(), "Catalog search finished");

        let Some(selection) = select(&candidates) else {
            span.record(LOOKUP_OUTCOME, "not_found");
            info!("No catalog candidates for song");
            return Ok(Resolution::NotFound);
        };

        let record = selection.into_record(title, artist);
        span.record(LOOKUP_OUTCOME, "catalog");
        record_song_fields(&span, &record);
        info!(album = %record.album, year = ?record.year, "Resolved song from catalog");

        self.persist(record.clone()).await;

        Ok(Resolution::Found(record))
    }

    async fn persist(&self, record: SongRecord) {
        match self.persist_mode {
            PersistMode::Inline => store_record(self.store.as_ref(), &record).await,
            PersistMode::Background => {
                let store = Arc::clone(&self.store);
                tokio::spawn(
                    async move { store_record(store.as_ref(), &record).await }.in_current_span(),
                );
            }
        }
    }
}

/// Best-effort upsert; failures are logged and swallowed
async fn store_record(store: &dyn SongStore, record: &SongRecord) {
    match store.upsert(record).await {
        Ok(()) => debug!("Persisted resolved song"),
        Err(e) => {
            warn!(
                error = %e,
                title = %record.title,
                artist = %record.artist,
                "Failed to persist resolved song"
            );
            // Still the resolve span here, also when spawned
            mark_error(&Span::current(), &e);
        }
    }
}

fn mark_error(span: &Span, error: &StoreError) {
    span.record(OTEL_STATUS_CODE, "ERROR");
    span.record(OTEL_STATUS_MESSAGE, error.to_string().as_str());
}

fn record_song_fields(span: &Span, record: &SongRecord) {
    span.record(MEDIA_ALBUM_NAME, record.album.as_str());
    span.record(MEDIA_SONG_GENRE, record.genre.as_str());
    if let Some(year) = record.year {
        span.record(MEDIA_SONG_YEAR, year);
    }
    if let Some(duration_ms) = record.duration_ms {
        span.record(MEDIA_SONG_DURATION_MS, duration_ms);
    }
}
