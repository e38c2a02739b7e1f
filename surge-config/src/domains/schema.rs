//! Schema naming used by definition bootstrapping

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, Validatable, ValidationReport};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Schema the issuers' credential definitions are bound to
    pub name: String,

    pub version: String,

    /// Prefix for schemas produced by the create-schemas phase
    pub prefix: String,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            name: "didx_acc".to_string(),
            version: "0.1.0".to_string(),
            prefix: "schema".to_string(),
        }
    }
}

impl Validatable for SchemaConfig {
    fn validate(&self) -> ConfigResult<()> {
        let domain = self.domain_name();
        let mut report = ValidationReport::new();
        report.check(validate_required_string(&self.name, "name", domain));
        report.check(validate_required_string(&self.version, "version", domain));
        report.check(validate_required_string(&self.prefix, "prefix", domain));
        report.finish()
    }

    fn domain_name(&self) -> &'static str {
        "schema"
    }
}
