//! Credentials for the tenant-admin and governance scopes

use crate::error::ConfigResult;
use crate::validation::{validate_required_option, Validatable, ValidationReport};
use serde::{Deserialize, Serialize};

/// Authentication settings.
///
/// With `use_enterprise` off, static API keys are sent as `x-api-key`
/// headers. With it on, bearer tokens are fetched once per run through an
/// OAuth2 client-credentials exchange for each scope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub use_enterprise: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_admin_api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub governance_api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    /// Token endpoint path for the tenant-admin client, relative to the API base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth_endpoint: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub governance_client_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub governance_client_secret: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub governance_oauth_endpoint: Option<String>,
}

const REDACTED: &str = "********";

impl AuthConfig {
    /// Copy with every secret replaced, for display
    pub fn redacted(&self) -> Self {
        let mask = |value: &Option<String>| value.as_ref().map(|_| REDACTED.to_string());
        Self {
            tenant_admin_api_key: mask(&self.tenant_admin_api_key),
            governance_api_key: mask(&self.governance_api_key),
            client_secret: mask(&self.client_secret),
            governance_client_secret: mask(&self.governance_client_secret),
            ..self.clone()
        }
    }
}

impl Validatable for AuthConfig {
    fn validate(&self) -> ConfigResult<()> {
        let domain = self.domain_name();
        let mut report = ValidationReport::new();

        if self.use_enterprise {
            let required = [
                (&self.client_id, "client_id"),
                (&self.client_secret, "client_secret"),
                (&self.oauth_endpoint, "oauth_endpoint"),
                (&self.governance_client_id, "governance_client_id"),
                (&self.governance_client_secret, "governance_client_secret"),
                (&self.governance_oauth_endpoint, "governance_oauth_endpoint"),
            ];
            for (value, field) in required {
                report.check(validate_required_option(
                    value.as_deref(),
                    &format!("{} (required when use_enterprise is set)", field),
                    domain,
                ));
            }
        } else {
            report.check(validate_required_option(
                self.tenant_admin_api_key.as_deref(),
                "tenant_admin_api_key",
                domain,
            ));
            report.check(validate_required_option(
                self.governance_api_key.as_deref(),
                "governance_api_key",
                domain,
            ));
        }

        report.finish()
    }

    fn domain_name(&self) -> &'static str {
        "auth"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_mode_requires_both_keys() {
        let config = AuthConfig {
            tenant_admin_api_key: Some("adminApiKey".to_string()),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        let messages = err.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("governance_api_key"));
    }

    #[test]
    fn test_enterprise_mode_requires_client_identifiers() {
        let config = AuthConfig {
            use_enterprise: true,
            client_id: Some("tenant-admin".to_string()),
            client_secret: Some("secret".to_string()),
            oauth_endpoint: Some("auth/token".to_string()),
            ..Default::default()
        };
        let messages = config.validate().unwrap_err().messages();
        assert_eq!(messages.len(), 3);
        assert!(messages.iter().all(|m| m.contains("governance_")));
    }

    #[test]
    fn test_enterprise_mode_ignores_api_keys() {
        let config = AuthConfig {
            use_enterprise: true,
            client_id: Some("a".into()),
            client_secret: Some("b".into()),
            oauth_endpoint: Some("c".into()),
            governance_client_id: Some("d".into()),
            governance_client_secret: Some("e".into()),
            governance_oauth_endpoint: Some("f".into()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_redacted_hides_secrets_only() {
        let config = AuthConfig {
            tenant_admin_api_key: Some("adminApiKey".into()),
            client_id: Some("tenant-admin".into()),
            ..Default::default()
        };
        let redacted = config.redacted();
        assert_eq!(redacted.tenant_admin_api_key.as_deref(), Some(REDACTED));
        assert_eq!(redacted.client_id.as_deref(), Some("tenant-admin"));
        assert!(redacted.governance_api_key.is_none());
    }
}
