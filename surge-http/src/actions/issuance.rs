use crate::client::{tenant_headers, CloudApi};
use crate::errors::HttpResult;
use crate::types::{str_field, CredentialExchange};
use serde_json::{json, Value};
use tracing::warn;

const CREDENTIALS: &str = "tenant/v1/issuer/credentials";

/// Anoncreds attribute values for the test identity
pub fn credential_attributes(date_of_issue: &str) -> Value {
    json!({
        "date_of_birth": "1986-09-29",
        "id_number": "8698989898989",
        "country_of_birth": "South Africa",
        "citizen_status": "Citizen",
        "date_of_issue": date_of_issue,
        "gender": "MALE",
        "surname": "Doe",
        "nationality": "South African",
        "country_of_birth_iso_code": "ZA",
        "names": "John James",
    })
}

impl CloudApi {
    /// Offer a credential over an issuer connection
    pub async fn create_credential(
        &self,
        issuer_token: &str,
        credential_definition_id: &str,
        connection_id: &str,
        date_of_issue: &str,
    ) -> HttpResult<CredentialExchange> {
        let body = json!({
            "type": "anoncreds",
            "anoncreds_credential_detail": {
                "credential_definition_id": credential_definition_id,
                "attributes": credential_attributes(date_of_issue),
            },
            "save_exchange_record": false,
            "connection_id": connection_id,
        });
        self.post_json(CREDENTIALS, &tenant_headers(issuer_token)?, &body, None)
            .await?
            .ensure_success("create credential")?
            .json()
    }

    /// Holder requests the offered credential
    pub async fn accept_credential(
        &self,
        holder_token: &str,
        credential_exchange_id: &str,
    ) -> HttpResult<()> {
        self.post_empty(
            &format!("{}/{}/request", CREDENTIALS, credential_exchange_id),
            &tenant_headers(holder_token)?,
        )
        .await?
        .ensure_success("accept credential")?;
        Ok(())
    }

    /// Holder-side exchange id for the offer on `thread_id`
    pub async fn credential_exchange_id_by_thread(
        &self,
        holder_token: &str,
        thread_id: &str,
    ) -> HttpResult<Option<String>> {
        let records: Value = self
            .get(CREDENTIALS, &tenant_headers(holder_token)?, None)
            .await?
            .ensure_success("list credentials")?
            .json()?;

        let id = records
            .as_array()
            .into_iter()
            .flatten()
            .find(|r| r.get("thread_id").and_then(Value::as_str) == Some(thread_id))
            .and_then(|r| str_field(r, "credential_exchange_id"));

        if id.is_none() {
            warn!("No credential exchange found for thread {}", thread_id);
        }
        Ok(id)
    }
}
