//! Domain-specific configuration modules

pub mod api;
pub mod auth;
pub mod logging;
pub mod polling;
pub mod schema;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::{Validatable, ValidationReport};
use serde::{Deserialize, Serialize};

/// Main surge configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SurgeConfig {
    /// Workers, iterations, prefixes and phase flags
    pub test: test::TestConfig,

    /// Schema naming
    pub schema: schema::SchemaConfig,

    /// Target API
    pub api: api::ApiConfig,

    /// Authentication mode and credentials
    pub auth: auth::AuthConfig,

    /// Event confirmation polling
    pub polling: polling::PollingConfig,

    /// Logging configuration
    pub logging: logging::LoggingConfig,
}

impl SurgeConfig {
    /// Validate all domain configurations, reporting every failure at once
    pub fn validate_all(&self) -> ConfigResult<()> {
        let mut report = ValidationReport::new();
        report.absorb(self.test.validate());
        report.absorb(self.schema.validate());
        report.absorb(self.api.validate());
        report.absorb(self.auth.validate());
        report.absorb(self.polling.validate());
        report.absorb(self.logging.validate());
        report.finish()
    }

    /// Copy safe to print
    pub fn redacted(&self) -> Self {
        Self {
            auth: self.auth.redacted(),
            ..self.clone()
        }
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = SurgeConfig::default();
        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}
