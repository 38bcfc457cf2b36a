//! Telemetry attribute keys recorded on song lookup spans.
//!
//! The `tracing` span macros need literal field names, so the resolver spells
//! these out again when it declares its span. Keep both in sync; the span
//! export tests read the attributes back by these keys.

/// The name/title of the song being queried.
///
/// ## Examples
///
/// - `"Smells Like Teen Spirit"`
/// - `"Come As You Are"`
pub const MEDIA_SONG_NAME: &str = "media.song.name";

/// The name of the artist performing the song.
///
/// ## Examples
///
/// - `"Nirvana"`
/// - `"Foo Fighters"`
pub const MEDIA_ARTIST_NAME: &str = "media.artist.name";

/// The name of the album containing the song.
///
/// ## Examples
///
/// - `"Nevermind"`
/// - `"In Utero"`
pub const MEDIA_ALBUM_NAME: &str = "media.album.name";

/// The release year of the song.
pub const MEDIA_SONG_YEAR: &str = "media.song.year";

/// The duration of the song in milliseconds.
pub const MEDIA_SONG_DURATION_MS: &str = "media.song.duration_ms";

/// The musical genre of the song.
pub const MEDIA_SONG_GENRE: &str = "media.song.genre";

/// How the lookup ended: `cache_hit`, `catalog` or `not_found`.
pub const LOOKUP_OUTCOME: &str = "lookup.outcome";

/// HTTP status code sent back to the client.
pub const HTTP_RESPONSE_STATUS_CODE: &str = "http.response.status_code";

/// Span status understood by the OpenTelemetry layer (`"OK"` or `"ERROR"`).
pub const OTEL_STATUS_CODE: &str = "otel.status_code";

/// Description attached to an `ERROR` span status.
pub const OTEL_STATUS_MESSAGE: &str = "otel.status_message";
