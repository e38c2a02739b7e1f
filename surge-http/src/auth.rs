//! Tenant-admin and governance authentication
//!
//! The mode is decided once from configuration; headers are resolved once
//! per run and then shared read-only by every worker.

use crate::client::{header_value, CloudApi, API_KEY_HEADER};
use crate::errors::{HttpError, HttpResult};
use crate::types::AccessToken;
use reqwest::header::{HeaderMap, HeaderName, AUTHORIZATION};
use serde::Deserialize;
use surge_config::AuthConfig;
use tracing::{error, info};

/// OAuth2 client-credentials for one scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
    /// Token endpoint path relative to the API base URL
    pub token_endpoint: String,
}

/// How the harness authenticates against admin endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMode {
    /// Static keys sent as `x-api-key: <scope>.<key>`
    ApiKey {
        tenant_admin: String,
        governance: String,
    },
    /// Bearer tokens from a client-credentials exchange per scope
    Enterprise {
        tenant_admin: ClientCredentials,
        governance: ClientCredentials,
    },
}

/// Resolved header sets for both admin scopes
#[derive(Debug, Clone, Default)]
pub struct AuthHeaders {
    pub tenant_admin: HeaderMap,
    pub governance: HeaderMap,
}

#[derive(Debug, Default, Deserialize)]
struct TokenError {
    error_description: Option<String>,
}

fn required(value: &Option<String>, name: &str) -> HttpResult<String> {
    value
        .clone()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| HttpError::ConfigError(format!("{} is not set", name)))
}

impl AuthMode {
    /// Select the mode from validated configuration
    pub fn from_config(config: &AuthConfig) -> HttpResult<Self> {
        if config.use_enterprise {
            Ok(AuthMode::Enterprise {
                tenant_admin: ClientCredentials {
                    client_id: required(&config.client_id, "CLIENT_ID")?,
                    client_secret: required(&config.client_secret, "CLIENT_SECRET")?,
                    token_endpoint: required(&config.oauth_endpoint, "OAUTH_ENDPOINT")?,
                },
                governance: ClientCredentials {
                    client_id: required(&config.governance_client_id, "GOVERNANCE_CLIENT_ID")?,
                    client_secret: required(
                        &config.governance_client_secret,
                        "GOVERNANCE_CLIENT_SECRET",
                    )?,
                    token_endpoint: required(
                        &config.governance_oauth_endpoint,
                        "GOVERNANCE_OAUTH_ENDPOINT",
                    )?,
                },
            })
        } else {
            Ok(AuthMode::ApiKey {
                tenant_admin: required(&config.tenant_admin_api_key, "TENANT_ADMIN_API_KEY")?,
                governance: required(&config.governance_api_key, "GOVERNANCE_API_KEY")?,
            })
        }
    }

    /// Produce both header sets, fetching bearer tokens if needed
    pub async fn resolve(&self, api: &CloudApi) -> HttpResult<AuthHeaders> {
        match self {
            AuthMode::ApiKey {
                tenant_admin,
                governance,
            } => {
                info!("Using API keys for authentication");
                Ok(AuthHeaders {
                    tenant_admin: api_key_headers("tenant-admin", tenant_admin)?,
                    governance: api_key_headers("governance", governance)?,
                })
            }
            AuthMode::Enterprise {
                tenant_admin,
                governance,
            } => {
                let admin_token = api.bearer_token("tenant-admin", tenant_admin).await?;
                let governance_token = api.bearer_token("governance", governance).await?;
                info!("Obtained bearer tokens for tenant-admin and governance");
                Ok(AuthHeaders {
                    tenant_admin: bearer_headers(&admin_token)?,
                    governance: bearer_headers(&governance_token)?,
                })
            }
        }
    }
}

fn api_key_headers(scope: &str, key: &str) -> HttpResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(API_KEY_HEADER),
        header_value(&format!("{}.{}", scope, key))?,
    );
    Ok(headers)
}

fn bearer_headers(token: &str) -> HttpResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", token))?);
    Ok(headers)
}

impl CloudApi {
    /// Client-credentials exchange against `<base>/<token_endpoint>`
    pub async fn bearer_token(
        &self,
        scope: &'static str,
        credentials: &ClientCredentials,
    ) -> HttpResult<String> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
        ];
        let response = self.post_form(&credentials.token_endpoint, &form).await?;

        if response.status != reqwest::StatusCode::OK {
            let description = serde_json::from_str::<TokenError>(&response.body)
                .ok()
                .and_then(|e| e.error_description)
                .unwrap_or_else(|| response.body.clone());
            error!("Failed to obtain {} bearer token: {}", scope, description);
            return Err(HttpError::Auth {
                scope,
                status: response.status,
                description,
            });
        }

        response
            .json::<AccessToken>()?
            .access_token
            .ok_or(HttpError::MissingField {
                action: "token exchange",
                field: "access_token",
            })
    }
}
