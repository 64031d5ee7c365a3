use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] quotes_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No quotes found for category: {0}")]
    NoQuotes(String),
    #[error("No unresolved conflict at index {0}")]
    ConflictNotFound(usize),
    #[error("Sync did not complete")]
    SyncFailed,
}
