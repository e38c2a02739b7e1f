//! Configuration error types

use thiserror::Error;

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// One or more validation failures, reported together
    #[error("Invalid configuration: {}", .0.join("; "))]
    ValidationError(Vec<String>),

    /// Environment variable error
    #[error("Environment variable error: {}", .0.join("; "))]
    EnvError(Vec<String>),

    /// A single failed rule in one domain
    #[error("Domain configuration error in {domain}: {message}")]
    DomainError { domain: String, message: String },
}

impl ConfigError {
    /// Flatten this error into individual human-readable messages
    pub fn messages(&self) -> Vec<String> {
        match self {
            ConfigError::ValidationError(messages) | ConfigError::EnvError(messages) => {
                messages.clone()
            }
            other => vec![other.to_string()],
        }
    }
}
