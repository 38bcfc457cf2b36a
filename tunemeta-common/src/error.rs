//! Common error types for tunemeta

use thiserror::Error;

/// Common result type for tunemeta operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across tunemeta crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
