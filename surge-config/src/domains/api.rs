//! Cloud API endpoint configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_url, Validatable, ValidationReport};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Target service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the credential-issuance API
    pub base_url: String,

    /// Default per-request timeout
    #[serde(with = "crate::domains::utils::serde_duration")]
    pub timeout: Duration,

    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://cloudapi.127.0.0.1.nip.io".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("surge/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Validatable for ApiConfig {
    fn validate(&self) -> ConfigResult<()> {
        let domain = self.domain_name();
        let mut report = ValidationReport::new();
        report.check(validate_url(&self.base_url, "base_url", domain));
        report.check(validate_positive(self.timeout.as_secs(), "timeout", domain));
        report.finish()
    }

    fn domain_name(&self) -> &'static str {
        "api"
    }
}
