//! Resolved song metadata

use serde::{Deserialize, Serialize};

/// Album/genre placeholder when the catalog has nothing better
pub const UNKNOWN: &str = "Unknown";

/// One persisted song row, keyed by (title, artist) case-insensitively
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SongRecord {
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Four-digit release year
    pub year: Option<i32>,
    pub duration_ms: Option<i32>,
    pub genre: String,
}

/// Metadata picked from catalog candidates, before it is tied to a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub album: String,
    pub year: Option<i32>,
    pub duration_ms: Option<i32>,
    pub genre: String,
}

impl Selection {
    /// Attach the requested title/artist to produce a storable record
    pub fn into_record(self, title: &str, artist: &str) -> SongRecord {
        SongRecord {
            title: title.to_string(),
            artist: artist.to_string(),
            album: self.album,
            year: self.year,
            duration_ms: self.duration_ms,
            genre: self.genre,
        }
    }
}
