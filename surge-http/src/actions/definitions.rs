use crate::client::{tenant_headers, CloudApi};
use crate::errors::{HttpError, HttpResult};
use crate::types::{first_item, str_field, Identified, SCHEMA_ATTRIBUTES};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::info;

const SCHEMAS: &str = "governance/v1/definitions/schemas";
const CREDENTIAL_DEFINITIONS: &str = "tenant/v1/definitions/credentials";

/// Ledger writes can take a long time
const DEFINITION_TIMEOUT: Duration = Duration::from_secs(120);

/// Revocation registry capacity for new credential definitions
pub const REVOCATION_REGISTRY_SIZE: u32 = 100;

fn missing_id(action: &'static str) -> HttpError {
    HttpError::MissingField { action, field: "id" }
}

impl CloudApi {
    /// Register an anoncreds schema with the identity attributes
    pub async fn create_schema(
        &self,
        governance: &HeaderMap,
        name: &str,
        version: &str,
    ) -> HttpResult<String> {
        let body = json!({
            "name": name,
            "version": version,
            "schema_type": "anoncreds",
            "attribute_names": SCHEMA_ATTRIBUTES,
        });
        self.post_json(SCHEMAS, governance, &body, Some(DEFINITION_TIMEOUT))
            .await?
            .ensure_status("create schema", StatusCode::OK)?
            .json::<Identified>()?
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| missing_id("create schema"))
    }

    /// Id of an existing schema, `None` when the lookup returns an empty list
    pub async fn schema_id(
        &self,
        governance: &HeaderMap,
        name: &str,
        version: &str,
    ) -> HttpResult<Option<String>> {
        let schemas: Value = self
            .get_query(
                SCHEMAS,
                governance,
                &[("schema_name", name), ("schema_version", version)],
            )
            .await?
            .ensure_success("get schema")?
            .json()?;
        Ok(first_item(&schemas).and_then(|s| str_field(s, "id")))
    }

    /// Check-then-create; concurrent callers may both create
    pub async fn ensure_schema(
        &self,
        governance: &HeaderMap,
        name: &str,
        version: &str,
    ) -> HttpResult<String> {
        if let Some(id) = self.schema_id(governance, name, version).await? {
            info!("Schema {} {} already exists: {}", name, version, id);
            return Ok(id);
        }
        let id = self.create_schema(governance, name, version).await?;
        info!("Created schema {} {}: {}", name, version, id);
        Ok(id)
    }

    /// Revocable credential definition for `schema_id`
    pub async fn create_credential_definition(
        &self,
        issuer_token: &str,
        tag: &str,
        schema_id: &str,
    ) -> HttpResult<String> {
        let body = json!({
            "tag": tag,
            "schema_id": schema_id,
            "support_revocation": true,
            "revocation_registry_size": REVOCATION_REGISTRY_SIZE,
        });
        self.post_json(
            CREDENTIAL_DEFINITIONS,
            &tenant_headers(issuer_token)?,
            &body,
            Some(DEFINITION_TIMEOUT),
        )
        .await?
        .ensure_status("create credential definition", StatusCode::OK)?
        .json::<Identified>()?
        .id
        .ok_or_else(|| missing_id("create credential definition"))
    }

    /// Id of the issuer's credential definition with `tag`
    pub async fn credential_definition_id(
        &self,
        issuer_token: &str,
        tag: &str,
        schema_version: &str,
    ) -> HttpResult<Option<String>> {
        let definitions: Value = self
            .get_query(
                CREDENTIAL_DEFINITIONS,
                &tenant_headers(issuer_token)?,
                &[("schema_version", schema_version)],
            )
            .await?
            .ensure_success("get credential definitions")?
            .json()?;

        let id = definitions
            .as_array()
            .into_iter()
            .flatten()
            .find(|d| d.get("tag").and_then(Value::as_str) == Some(tag))
            .and_then(|d| str_field(d, "id"));

        match &id {
            Some(id) => info!("Credential definition found for tag {}: {}", tag, id),
            None => info!("Credential definition not found for tag {}", tag),
        }
        Ok(id)
    }
}
