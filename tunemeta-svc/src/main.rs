//! tunemeta-svc - Song metadata microservice
//!
//! Serves `GET /songs/:title/:artist` from a local SQLite cache, falling back
//! to the MusicBrainz recording search on a miss.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tunemeta_common::config::{ConfigOverrides, ServiceConfig};

use tunemeta_svc::db::SqliteSongStore;
use tunemeta_svc::services::{MusicBrainzClient, PersistMode, Resolver};
use tunemeta_svc::{build_router, AppState};

/// Command-line arguments for tunemeta-svc
#[derive(Parser, Debug)]
#[command(name = "tunemeta-svc")]
#[command(about = "Song metadata resolution service")]
#[command(version)]
struct Args {
    /// TOML config file (lowest priority after defaults)
    #[arg(short, long, env = "TUNEMETA_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "TUNEMETA_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "TUNEMETA_PORT")]
    port: Option<u16>,

    /// SQLite database URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Maximum pooled database connections
    #[arg(long, env = "TUNEMETA_DB_MAX_CONNECTIONS")]
    max_connections: Option<u32>,

    /// MusicBrainz recording search endpoint
    #[arg(long, env = "MUSIC_SERVICE_URL")]
    music_service_url: Option<String>,

    /// Outbound catalog requests per second
    #[arg(long, env = "TUNEMETA_CATALOG_RPS")]
    requests_per_second: Option<u32>,

    /// Persist catalog results after responding instead of before
    #[arg(long, env = "TUNEMETA_BACKGROUND_PERSISTENCE")]
    background_persistence: Option<bool>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            database_url: self.database_url.clone(),
            max_connections: self.max_connections,
            music_service_url: self.music_service_url.clone(),
            requests_per_second: self.requests_per_second,
            background_persistence: self.background_persistence,
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = ServiceConfig::resolve(args.config.as_deref(), args.overrides())
        .context("Invalid configuration")?;

    let tracer_provider = init_tracer_provider()?;
    let otel_layer = tracer_provider.as_ref().map(|provider| {
        tracing_opentelemetry::layer().with_tracer(provider.tracer(env!("CARGO_PKG_NAME")))
    });

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(otel_layer)
        .init();

    if tracer_provider.is_some() {
        info!("Exporting spans over OTLP");
    }

    info!(
        "Starting tunemeta-svc v{} on {}:{}",
        env!("CARGO_PKG_VERSION"),
        config.server.host,
        config.server.port
    );

    let store = SqliteSongStore::open(&config.database)
        .await
        .context("Failed to open song database")?;
    info!("Database connection established");

    let catalog = MusicBrainzClient::new(&config.catalog)
        .context("Failed to build MusicBrainz client")?;
    info!(url = %config.catalog.base_url, "Catalog client ready");

    let persist_mode = if config.persistence.background {
        PersistMode::Background
    } else {
        PersistMode::Inline
    };
    let resolver = Resolver::new(Arc::new(store.clone()), Arc::new(catalog))
        .with_persist_mode(persist_mode);

    let app = build_router(AppState::new(resolver));

    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port))
            .await
            .context("Failed to bind to address")?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    store.close().await;

    if let Some(provider) = tracer_provider {
        // Flushes pending batches; the exporter may block on network I/O
        let shutdown = tokio::task::spawn_blocking(move || provider.shutdown()).await?;
        if let Err(e) = shutdown {
            warn!(error = %e, "Span exporter shutdown failed");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// OTLP span export, enabled by `OTEL_EXPORTER_OTLP_ENDPOINT`
///
/// The exporter reads the endpoint and the other `OTEL_EXPORTER_OTLP_*`
/// variables itself.
fn init_tracer_provider() -> Result<Option<SdkTracerProvider>> {
    let enabled = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .map(|endpoint| !endpoint.trim().is_empty())
        .unwrap_or(false);
    if !enabled {
        return Ok(None);
    }

    opentelemetry::global::set_text_map_propagator(TraceContextPropagator::new());

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .build()
        .context("Failed to build OTLP span exporter")?;

    let provider = SdkTracerProvider::builder()
        .with_resource(
            Resource::builder()
                .with_service_name(env!("CARGO_PKG_NAME"))
                .build(),
        )
        .with_batch_exporter(exporter)
        .build();

    Ok(Some(provider))
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
