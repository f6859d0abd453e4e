//! Error types for store listener binding.

use thiserror::Error;

/// Main error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("No events found on listener configuration for store with ID \"{0}\"")]
    MissingEvents(String),

    #[error("No store provided for configured store ID \"{0}\"")]
    StoreNotProvided(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ListenerError {
    fn from(e: serde_json::Error) -> Self {
        ListenerError::Config(e.to_string())
    }
}

/// Result type for listener operations.
pub type Result<T> = std::result::Result<T, ListenerError>;
