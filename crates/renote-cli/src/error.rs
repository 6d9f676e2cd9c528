use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No draft found for invoice {0}")]
    DraftNotFound(i64),
    #[error("Failed to persist the draft collection")]
    PersistFailed,
}
