//! Error types for renote-core

use thiserror::Error;

/// Result type alias using renote-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in renote-core operations
///
/// Expected conditions (missing invoice id, unreadable store) never surface
/// here; they are signaled through return values so the form stays usable
/// when persistence is broken.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Draft storage error
    #[error("Storage error: {0}")]
    Storage(String),
}
