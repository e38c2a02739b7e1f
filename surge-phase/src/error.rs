//! Phase data exchange errors

use std::io;
use thiserror::Error;

pub type ExchangeResult<T> = Result<T, ExchangeError>;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Filesystem error during {operation} of {path}: {source}")]
    Filesystem {
        path: String,
        operation: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("Malformed record at {path}:{line}: {source}")]
    Record {
        path: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize record: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No input record at index {index} ({available} available)")]
    MissingRecord { index: usize, available: usize },
}

impl ExchangeError {
    pub(crate) fn filesystem(
        path: &std::path::Path,
        operation: &'static str,
        source: io::Error,
    ) -> Self {
        ExchangeError::Filesystem {
            path: path.display().to_string(),
            operation,
            source,
        }
    }
}
