//! Test doubles for the store and catalog gateways, plus span capture

#![allow(dead_code)]

use async_trait::async_trait;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracerProvider, SpanData};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::layer::SubscriberExt;
use tunemeta_svc::models::{Candidate, Release, SongRecord, Tag};
use tunemeta_svc::services::{CatalogGateway, SongStore, StoreError};

/// In-memory song store keyed case-insensitively
#[derive(Default)]
pub struct FakeStore {
    rows: Mutex<HashMap<(String, String), SongRecord>>,
    pub lookups: AtomicUsize,
    pub upserts: AtomicUsize,
    pub fail_lookup: bool,
    pub fail_upsert: bool,
}

impl FakeStore {
    pub fn with_row(record: SongRecord) -> Self {
        let store = Self::default();
        store.rows.lock().unwrap().insert(key(&record.title, &record.artist), record);
        store
    }

    pub fn failing_lookup() -> Self {
        Self {
            fail_lookup: true,
            ..Default::default()
        }
    }

    pub fn failing_upsert() -> Self {
        Self {
            fail_upsert: true,
            ..Default::default()
        }
    }

    pub fn row(&self, title: &str, artist: &str) -> Option<SongRecord> {
        self.rows.lock().unwrap().get(&key(title, artist)).cloned()
    }

    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }
}

fn key(title: &str, artist: &str) -> (String, String) {
    (title.to_lowercase(), artist.to_lowercase())
}

#[async_trait]
impl SongStore for FakeStore {
    async fn lookup(&self, title: &str, artist: &str) -> Result<Option<SongRecord>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookup {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(self.row(title, artist))
    }

    async fn upsert(&self, record: &SongRecord) -> Result<(), StoreError> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        if self.fail_upsert {
            return Err(StoreError::Unavailable("disk full".to_string()));
        }
        self.rows
            .lock()
            .unwrap()
            .entry(key(&record.title, &record.artist))
            .or_insert_with(|| record.clone());
        Ok(())
    }
}

/// Catalog returning a fixed candidate list
#[derive(Default)]
pub struct FakeCatalog {
    candidates: Vec<Candidate>,
    pub searches: AtomicUsize,
}

impl FakeCatalog {
    pub fn returning(candidates: Vec<Candidate>) -> Self {
        Self {
            candidates,
            searches: AtomicUsize::new(0),
        }
    }

    pub fn search_count(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogGateway for FakeCatalog {
    async fn search(&self, _title: &str, _artist: &str) -> Vec<Candidate> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        self.candidates.clone()
    }
}

pub fn song(title: &str, artist: &str) -> SongRecord {
    SongRecord {
        title: title.to_string(),
        artist: artist.to_string(),
        album: "Nevermind".to_string(),
        year: Some(1991),
        duration_ms: Some(257_000),
        genre: "grunge".to_string(),
    }
}

pub fn dated_candidate(album: &str, date: &str) -> Candidate {
    Candidate {
        duration_ms: None,
        tags: Vec::new(),
        releases: vec![Release::new(album, date)],
    }
}

pub fn tagged(mut candidate: Candidate, tag: &str) -> Candidate {
    candidate.tags.push(Tag::new(tag));
    candidate
}

/// OpenTelemetry layer exporting into memory, installed for the current thread
pub struct SpanCapture {
    exporter: InMemorySpanExporter,
    provider: SdkTracerProvider,
    _guard: DefaultGuard,
}

impl SpanCapture {
    pub fn install() -> Self {
        let exporter = InMemorySpanExporter::default();
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        let subscriber = tracing_subscriber::registry()
            .with(tracing_opentelemetry::layer().with_tracer(provider.tracer("tunemeta-test")));

        Self {
            exporter,
            provider,
            _guard: tracing::subscriber::set_default(subscriber),
        }
    }

    /// Finished spans with the given name
    pub fn spans(&self, name: &str) -> Vec<SpanData> {
        let _ = self.provider.force_flush();
        self.exporter
            .get_finished_spans()
            .unwrap()
            .into_iter()
            .filter(|span| span.name == name)
            .collect()
    }

    pub fn single(&self, name: &str) -> SpanData {
        let mut spans = self.spans(name);
        assert_eq!(spans.len(), 1, "Expected exactly one {name} span");
        spans.remove(0)
    }
}

/// Attribute value rendered as a string
pub fn attribute(span: &SpanData, key: &str) -> Option<String> {
    span.attributes
        .iter()
        .find(|kv| kv.key.as_str() == key)
        .map(|kv| kv.value.as_str().into_owned())
}
