//! MusicBrainz recording search client
//!
//! Catalog gateway over `GET <base_url>?query=...&fmt=json&limit=20`, rate
//! limited to the configured requests per second.

use crate::models::{Candidate, Release, Tag};
use crate::services::gateway::{CatalogError, CatalogGateway};
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use serde::Deserialize;
use std::num::NonZeroU32;
use tracing::{debug, warn};
use tunemeta_common::config::CatalogConfig;

/// Maximum number of recordings requested per search
pub const SEARCH_LIMIT: u32 = 20;

#[derive(Debug, Deserialize)]
struct MBSearchResponse {
    recordings: Option<Vec<MBRecording>>,
}

#[derive(Debug, Deserialize)]
struct MBRecording {
    /// Length in milliseconds
    length: Option<u64>,
    releases: Option<Vec<MBRelease>>,
    tags: Option<Vec<MBTag>>,
}

#[derive(Debug, Deserialize)]
struct MBRelease {
    title: Option<String>,
    /// "YYYY", "YYYY-MM" or "YYYY-MM-DD"
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MBTag {
    name: String,
}

impl From<MBRecording> for Candidate {
    fn from(recording: MBRecording) -> Self {
        Candidate {
            duration_ms: recording.length.and_then(|ms| i32::try_from(ms).ok()),
            tags: recording
                .tags
                .unwrap_or_default()
                .into_iter()
                .map(|t| Tag { name: t.name })
                .collect(),
            releases: recording
                .releases
                .unwrap_or_default()
                .into_iter()
                .map(|r| Release {
                    title: r.title,
                    date: r.date,
                })
                .collect(),
        }
    }
}

/// MusicBrainz API client
pub struct MusicBrainzClient {
    http_client: reqwest::Client,
    base_url: String,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl MusicBrainzClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        let per_second = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
            rate_limiter: RateLimiter::direct(Quota::per_second(per_second)),
        })
    }

    /// Search recordings by title and artist
    ///
    /// Unlike [`CatalogGateway::search`], failures are returned to the caller.
    pub async fn search_recordings(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<Vec<Candidate>, CatalogError> {
        self.rate_limiter.until_ready().await;

        let query = build_query(title, artist);
        debug!(url = %self.base_url, query = %query, "Querying MusicBrainz API");

        let limit = SEARCH_LIMIT.to_string();
        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[("query", query.as_str()), ("fmt", "json"), ("limit", limit.as_str())])
            .send()
            .await
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError(status.as_u16(), error_text));
        }

        let body: MBSearchResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::ParseError(e.to_string()))?;

        let candidates: Vec<Candidate> = body
            .recordings
            .unwrap_or_default()
            .into_iter()
            .map(Candidate::from)
            .collect();

        debug!(count = candidates.len(), "Retrieved recordings from MusicBrainz");

        Ok(candidates)
    }
}

#[async_trait]
impl CatalogGateway for MusicBrainzClient {
    async fn search(&self, title: &str, artist: &str) -> Vec<Candidate> {
        match self.search_recordings(title, artist).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(error = %e, title = %title, artist = %artist, "MusicBrainz search failed");
                Vec::new()
            }
        }
    }
}

/// Lucene query matching both fields as exact phrases
fn build_query(title: &str, artist: &str) -> String {
    format!(
        "recording:\"{}\" AND artist:\"{}\"",
        escape_phrase(title),
        escape_phrase(artist)
    )
}

/// Escape the characters that can terminate a quoted Lucene phrase
fn escape_phrase(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '"' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = MusicBrainzClient::new(&CatalogConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_build_query() {
        assert_eq!(
            build_query("Lithium", "Nirvana"),
            r#"recording:"Lithium" AND artist:"Nirvana""#
        );
    }

    #[test]
    fn test_query_escapes_phrase_terminators() {
        assert_eq!(
            build_query(r#"Say "Hi""#, r"AC\DC"),
            r#"recording:"Say \"Hi\"" AND artist:"AC\\DC""#
        );
    }

    #[test]
    fn test_recording_conversion() {
        let json = r#"{
            "recordings": [
                {
                    "id": "abc",
                    "title": "Lithium",
                    "length": 257000,
                    "tags": [{"count": 3, "name": "grunge"}],
                    "releases": [
                        {"id": "r1", "title": "Nevermind", "date": "1991-09-24"},
                        {"id": "r2", "title": "Live"}
                    ]
                },
                {"id": "def", "title": "Lithium", "length": null}
            ]
        }"#;

        let response: MBSearchResponse = serde_json::from_str(json).unwrap();
        let candidates: Vec<Candidate> = response
            .recordings
            .unwrap()
            .into_iter()
            .map(Candidate::from)
            .collect();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].duration_ms, Some(257_000));
        assert_eq!(candidates[0].tags, vec![Tag::new("grunge")]);
        assert_eq!(candidates[0].releases[0], Release::new("Nevermind", "1991-09-24"));
        assert_eq!(candidates[0].releases[1].date, None);
        assert_eq!(candidates[1], Candidate::default());
    }

    #[test]
    fn test_oversized_length_is_dropped() {
        let recording = MBRecording {
            length: Some(u64::MAX),
            releases: None,
            tags: None,
        };
        assert_eq!(Candidate::from(recording).duration_ms, None);
    }
}
