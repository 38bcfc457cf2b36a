//! # Tunemeta Common Library
//!
//! Shared code for the tunemeta song metadata service:
//! - Error type shared by the service crates
//! - Layered configuration (CLI → ENV → TOML → defaults)
//! - SQLite pool initialization and schema
//! - Telemetry attribute keys for song lookups

pub mod attributes;
pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
