use crate::soul::model::SetStatus;
use rusqlite;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SoulError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Storage error: {0}")]
    StorageError(#[from] rusqlite::Error),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("Failed to initialize database: {0}")]
    DatabaseInitializationError(String),
    #[error("Failed to serialize record: {0}")]
    SerializationError(#[source] serde_json::Error),
    #[error("Failed to decode record '{key}': {source}")]
    DecodeError {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Invalid transition for governor set '{id}': {from} -> {to}")]
    InvalidTransition {
        id: String,
        from: SetStatus,
        to: SetStatus,
    },
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SoulError {
    /// True when the requested record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SoulError::NotFound(_))
    }

    /// True for failures of the backing medium rather than of the caller's request.
    /// A corrupt stored record counts as one.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            SoulError::StorageError(_)
                | SoulError::IoError(_)
                | SoulError::DatabaseInitializationError(_)
                | SoulError::SerializationError(_)
                | SoulError::DecodeError { .. }
        )
    }
}
