//! HTTP error types

use reqwest::StatusCode;

pub type HttpResult<T> = Result<T, HttpError>;

/// Error type for Cloud API operations
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("{action} returned {status}: {body}")]
    UnexpectedStatus {
        action: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("{action} response is missing {field}")]
    MissingField {
        action: &'static str,
        field: &'static str,
    },

    #[error("Failed to obtain {scope} bearer token ({status}): {description}")]
    Auth {
        scope: &'static str,
        status: StatusCode,
        description: String,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl HttpError {
    /// Whether the failure happened before any response was received
    pub fn is_timeout(&self) -> bool {
        matches!(self, HttpError::NetworkError(e) if e.is_timeout())
    }
}
