//! Song store backed by SQLite
//!
//! Rows are keyed by (title, artist) under `NOCASE` collation. Lookups are
//! plain case-insensitive equality; `%` and `_` in a request match literally.

use crate::models::SongRecord;
use crate::services::gateway::{SongStore, StoreError};
use async_trait::async_trait;
use sqlx::SqlitePool;
use tunemeta_common::config::DatabaseConfig;

/// [`SongStore`] over a bounded sqlx pool
#[derive(Clone)]
pub struct SqliteSongStore {
    pool: SqlitePool,
}

impl SqliteSongStore {
    /// Open the pool and ensure the schema exists
    pub async fn open(config: &DatabaseConfig) -> tunemeta_common::Result<Self> {
        let pool = tunemeta_common::db::init_database(config).await?;
        Ok(Self { pool })
    }

    /// Wrap an already-initialized pool
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every pooled connection; later calls fail with `PoolClosed`
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl SongStore for SqliteSongStore {
    async fn lookup(&self, title: &str, artist: &str) -> Result<Option<SongRecord>, StoreError> {
        let record = sqlx::query_as::<_, SongRecord>(
            r#"
            SELECT title, artist, album, year, duration_ms, genre
            FROM songs
            WHERE title = ? AND artist = ?
            "#,
        )
        .bind(title)
        .bind(artist)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn upsert(&self, record: &SongRecord) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO songs (title, artist, album, year, duration_ms, genre)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(title, artist) DO NOTHING
            "#,
        )
        .bind(&record.title)
        .bind(&record.artist)
        .bind(&record.album)
        .bind(record.year)
        .bind(record.duration_ms)
        .bind(&record.genre)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(
                title = %record.title,
                artist = %record.artist,
                "Song already stored, insert skipped"
            );
        }

        Ok(())
    }
}
