//! Storage backend errors.

use std::path::PathBuf;

use eventhub_core::error::DomainError;
use thiserror::Error;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing a state file failed.
    #[error("i/o error on {path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A state file did not contain valid JSON.
    #[error("corrupt state file {path}: {source}")]
    Corrupt {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// The key cannot be mapped to a file name.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

impl From<StorageError> for DomainError {
    fn from(err: StorageError) -> Self {
        Self::Infrastructure(err.to_string())
    }
}
