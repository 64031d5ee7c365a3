//! Error types for quotes-core

use thiserror::Error;

/// Result type alias using quotes-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in quotes-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Rejected import payload
    #[error("Import failed: {0}")]
    InvalidImport(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP transport error talking to the remote source
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote source answered with a non-success status
    #[error("Remote returned {status}: {body}")]
    Remote { status: u16, body: String },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
