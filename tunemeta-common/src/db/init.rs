//! Database initialization
//!
//! Opens the bounded SQLite pool that backs the song store and creates the
//! `songs` table on first run.

use crate::config::DatabaseConfig;
use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Open the connection pool described by `config` and create tables if needed
pub async fn init_database(config: &DatabaseConfig) -> Result<SqlitePool> {
    // WAL allows concurrent readers while one resolution writes
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .idle_timeout(config.idle_timeout())
        .acquire_timeout(config.acquire_timeout())
        .connect_with(options)
        .await?;

    info!(
        url = %config.url,
        max_connections = config.max_connections,
        "Opened song database"
    );

    create_songs_table(&pool).await?;

    Ok(pool)
}

/// Create the songs table (idempotent)
///
/// `(title, artist)` is unique under `NOCASE`, which makes the key
/// case-insensitive for both lookup and the insert conflict check.
pub async fn create_songs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS songs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL COLLATE NOCASE,
            artist TEXT NOT NULL COLLATE NOCASE,
            album TEXT NOT NULL,
            year INTEGER,
            duration_ms INTEGER,
            genre TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (title, artist)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
