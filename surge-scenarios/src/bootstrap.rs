//! Issuer bootstrap shared by the connection phases
//!
//! Check-then-create: each issuer tenant, its credential definition and the
//! schema behind it are reused when present. Two setups racing on the same
//! names may both create; setup is expected to run once per test run.

use crate::error::{ScenarioError, ScenarioResult};
use crate::harness::Harness;
use serde::{Deserialize, Serialize};
use tracing::info;

/// An issuer ready to connect and issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuerProfile {
    pub wallet_name: String,
    pub wallet_id: String,
    pub access_token: String,
    pub credential_definition_id: String,
}

/// Make sure `num_issuers` issuers exist with a credential definition each.
///
/// The credential definition tag is the issuer's wallet name.
pub async fn bootstrap_issuers(harness: &Harness) -> ScenarioResult<Vec<IssuerProfile>> {
    let api = &harness.api;
    let test = &harness.config.test;
    let schema = &harness.config.schema;
    let mut issuers = Vec::with_capacity(test.num_issuers as usize);
    let mut schema_id: Option<String> = None;

    for index in 0..test.num_issuers {
        let wallet_name = format!("{}_{}", test.issuer_prefix, index);
        let (wallet_id, access_token) = api
            .ensure_issuer_tenant(&harness.auth.tenant_admin, &wallet_name)
            .await?;

        let existing = api
            .credential_definition_id(&access_token, &wallet_name, &schema.version)
            .await?;
        let credential_definition_id = match existing {
            Some(id) => {
                info!(
                    "Credential definition already exists for {} - skipping creation",
                    wallet_name
                );
                id
            }
            None => {
                let schema_id = match &schema_id {
                    Some(id) => id.clone(),
                    None => {
                        let id = api
                            .ensure_schema(
                                &harness.auth.governance,
                                &schema.name,
                                &schema.version,
                            )
                            .await?;
                        schema_id = Some(id.clone());
                        id
                    }
                };
                api.create_credential_definition(&access_token, &wallet_name, &schema_id)
                    .await?
            }
        };

        issuers.push(IssuerProfile {
            wallet_name,
            wallet_id,
            access_token,
            credential_definition_id,
        });
    }

    if issuers.is_empty() {
        return Err(ScenarioError::missing("no issuers configured"));
    }
    info!("Bootstrapped {} issuers", issuers.len());
    Ok(issuers)
}
