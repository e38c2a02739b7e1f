//! Domain-driven configuration for surge
//!
//! Every knob the load-test phases read lives in one [`SurgeConfig`],
//! built once at process start from environment variables or a YAML file
//! and validated eagerly.

pub mod error;
pub mod loader;
pub mod validation;

pub mod domains;

pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

pub use domains::{
    api::ApiConfig,
    auth::AuthConfig,
    logging::{LogFormat, LogLevel, LoggingConfig},
    polling::PollingConfig,
    schema::SchemaConfig,
    test::{ProofSelection, TestConfig},
    SurgeConfig,
};

pub use domains::utils::serde_duration;
