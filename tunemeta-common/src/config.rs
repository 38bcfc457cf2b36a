//! Configuration loading and layered resolution
//!
//! Priority order for every setting:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Levels 1 and 2 arrive together as [`ConfigOverrides`] (clap reads the
//! environment for each flag), level 3 is [`load_toml_config`], level 4 is
//! [`ServiceConfig::default`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://tunemeta.db";
pub const DEFAULT_MUSIC_SERVICE_URL: &str = "https://musicbrainz.org/ws/2/recording";
pub const DEFAULT_USER_AGENT: &str = "tunemeta/0.1.0";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Complete service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub catalog: CatalogConfig,
    pub persistence: PersistenceConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Song store connection pool settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite connection URL (file is created if missing)
    pub url: String,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// Close connections idle for longer than this
    pub idle_timeout_ms: u64,
    /// Fail an acquire that cannot get a connection within this window
    pub acquire_timeout_ms: u64,
}

impl DatabaseConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 20,
            idle_timeout_ms: 30_000,
            acquire_timeout_ms: 2_000,
        }
    }
}

/// External catalog (MusicBrainz recording search) settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Recording search endpoint
    pub base_url: String,
    pub user_agent: String,
    /// Outbound request budget; MusicBrainz allows 1/s per client
    pub requests_per_second: u32,
    pub timeout_secs: u64,
}

impl CatalogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_MUSIC_SERVICE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            requests_per_second: 1,
            timeout_secs: 30,
        }
    }
}

/// Write-back behaviour after a catalog resolution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Spawn the upsert instead of awaiting it before responding
    pub background: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database_url: Option<String>,
    pub max_connections: Option<u32>,
    pub music_service_url: Option<String>,
    pub requests_per_second: Option<u32>,
    pub background_persistence: Option<bool>,
    pub log_level: Option<String>,
}

impl ServiceConfig {
    /// Resolve the effective configuration from an optional TOML file and
    /// CLI/ENV overrides, then validate it.
    pub fn resolve(toml_path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let base = match toml_path {
            Some(path) => load_toml_config(path)?,
            None => ServiceConfig::default(),
        };
        let config = base.with_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Apply higher-priority values on top of this configuration
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(url) = overrides.database_url {
            self.database.url = url;
        }
        if let Some(max) = overrides.max_connections {
            self.database.max_connections = max;
        }
        if let Some(url) = overrides.music_service_url {
            self.catalog.base_url = url;
        }
        if let Some(rps) = overrides.requests_per_second {
            self.catalog.requests_per_second = rps;
        }
        if let Some(background) = overrides.background_persistence {
            self.persistence.background = background;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        self
    }

    /// Reject settings the service cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.database.url.trim().is_empty() {
            return Err(Error::Config("database url must not be empty".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(Error::Config(
                "database max_connections must be at least 1".to_string(),
            ));
        }
        if self.catalog.base_url.trim().is_empty() {
            return Err(Error::Config("catalog base_url must not be empty".to_string()));
        }
        if self.catalog.requests_per_second == 0 {
            return Err(Error::Config(
                "catalog requests_per_second must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Read a TOML config file; missing sections fall back to defaults
pub fn load_toml_config(path: &Path) -> Result<ServiceConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))
}
