use crate::client::{tenant_headers, CloudApi};
use crate::errors::HttpResult;
use crate::types::str_field;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{info, warn};

const FIRE_AND_FORGET_TIMEOUT: Duration = Duration::from_secs(5);
const PUBLISH_TIMEOUT: Duration = Duration::from_secs(120);

/// Result of a publish-revocations call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The backend confirmed the publish
    Published,
    /// The request went out; the response was not awaited or not checked
    Dispatched,
}

impl CloudApi {
    /// Revoke an issued credential, optionally publishing straight to the ledger
    pub async fn revoke_credential(
        &self,
        issuer_token: &str,
        credential_exchange_id: &str,
        auto_publish: bool,
    ) -> HttpResult<()> {
        let mut body = json!({ "credential_exchange_id": credential_exchange_id });
        if auto_publish {
            body["auto_publish_on_ledger"] = Value::Bool(true);
        }
        self.post_json(
            "tenant/v1/issuer/credentials/revoke",
            &tenant_headers(issuer_token)?,
            &body,
            None,
        )
        .await?
        .ensure_status("revoke credential", reqwest::StatusCode::OK)?;
        Ok(())
    }

    /// Publish every pending revocation for the issuer.
    ///
    /// In fire-and-forget mode a short timeout is used and the outcome is
    /// never checked: responses, timeouts and transport errors all count as
    /// dispatched.
    pub async fn publish_revocations(
        &self,
        issuer_token: &str,
        fire_and_forget: bool,
    ) -> HttpResult<PublishOutcome> {
        let timeout = if fire_and_forget {
            FIRE_AND_FORGET_TIMEOUT
        } else {
            PUBLISH_TIMEOUT
        };
        let result = self
            .post_json(
                "tenant/v1/issuer/credentials/publish-revocations",
                &tenant_headers(issuer_token)?,
                &json!({ "revocation_registry_credential_map": {} }),
                Some(timeout),
            )
            .await;

        if fire_and_forget {
            match result {
                Ok(_) => info!("Publish revocation request fired (fire-and-forget)"),
                Err(e) if e.is_timeout() => {
                    info!("Publish revocation request fired, not awaiting response")
                }
                Err(e) => warn!("Publish revocation request fired, outcome ignored: {}", e),
            }
            return Ok(PublishOutcome::Dispatched);
        }

        result?.ensure_status("publish revocations", reqwest::StatusCode::OK)?;
        Ok(PublishOutcome::Published)
    }

    /// Revocation record state for an issuer-side exchange
    pub async fn revocation_state(
        &self,
        issuer_token: &str,
        credential_exchange_id: &str,
    ) -> HttpResult<Option<String>> {
        let record: Value = self
            .get_query(
                "tenant/v1/issuer/credentials/revocation/record",
                &tenant_headers(issuer_token)?,
                &[("credential_exchange_id", credential_exchange_id)],
            )
            .await?
            .ensure_status("check revocation record", reqwest::StatusCode::OK)?
            .json()?;
        let state = str_field(&record, "state");
        if state.is_none() {
            warn!("Revocation record for {} has no state", credential_exchange_id);
        }
        Ok(state)
    }
}
