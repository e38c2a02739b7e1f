use crate::client::{tenant_headers, CloudApi};
use crate::errors::HttpResult;
use crate::types::{ProofExchange, ProofRecord};
use serde_json::{json, Value};
use tracing::{debug, warn};

const PROOFS: &str = "tenant/v1/verifier/proofs";

/// Which of the holder's matching credentials to present.
///
/// `First` takes the first credential the backend lists, which is only
/// correct while the holder owns a single matching credential.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CredentialSelection {
    #[default]
    First,
    /// Credential whose `date_of_issue` attribute equals this value
    DateOfIssue(String),
}

fn credential_id(entry: &Value) -> Option<String> {
    entry
        .pointer("/cred_info/credential_id")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Pick a credential id out of a proof's candidate credentials
pub fn select_credential(candidates: &Value, selection: &CredentialSelection) -> Option<String> {
    let mut entries = candidates.as_array().into_iter().flatten();
    match selection {
        CredentialSelection::First => entries.next().and_then(credential_id),
        CredentialSelection::DateOfIssue(date) => entries
            .find(|entry| {
                entry
                    .pointer("/cred_info/attrs/date_of_issue")
                    .and_then(Value::as_str)
                    == Some(date.as_str())
            })
            .and_then(credential_id),
    }
}

impl CloudApi {
    /// Ask the holder on `connection_id` to prove their id number
    pub async fn send_proof_request(
        &self,
        issuer_token: &str,
        connection_id: &str,
    ) -> HttpResult<ProofExchange> {
        let body = json!({
            "type": "anoncreds",
            "anoncreds_proof_request": {
                "non_revoked": { "to": chrono::Utc::now().timestamp() },
                "requested_attributes": { "get_id_number": { "name": "id_number" } },
                "requested_predicates": {},
            },
            "save_exchange_record": true,
            "comment": "string",
            "connection_id": connection_id,
        });
        self.post_json(
            "tenant/v1/verifier/send-request",
            &tenant_headers(issuer_token)?,
            &body,
            None,
        )
        .await?
        .ensure_success("send proof request")?
        .json()
    }

    /// Proof records on `thread_id` visible to the token's wallet
    pub async fn proofs_by_thread(
        &self,
        token: &str,
        thread_id: &str,
    ) -> HttpResult<Vec<ProofRecord>> {
        self.get_query(PROOFS, &tenant_headers(token)?, &[("thread_id", thread_id)])
            .await?
            .ensure_success("get proofs")?
            .json()
    }

    /// Holder-side proof id for the request on `thread_id`
    pub async fn proof_id_by_thread(
        &self,
        holder_token: &str,
        thread_id: &str,
    ) -> HttpResult<Option<String>> {
        let proofs = self.proofs_by_thread(holder_token, thread_id).await?;
        Ok(proofs
            .into_iter()
            .find(|p| p.thread_id.as_deref() == Some(thread_id))
            .and_then(|p| p.proof_id))
    }

    /// Credential the holder should present for `proof_id`
    pub async fn proof_credential_id(
        &self,
        holder_token: &str,
        proof_id: &str,
        selection: &CredentialSelection,
    ) -> HttpResult<Option<String>> {
        let candidates: Value = self
            .get(
                &format!("{}/{}/credentials", PROOFS, proof_id),
                &tenant_headers(holder_token)?,
                None,
            )
            .await?
            .ensure_success("get proof credentials")?
            .json()?;

        let selected = select_credential(&candidates, selection);
        match (&selected, selection) {
            (Some(_), CredentialSelection::DateOfIssue(date)) => {
                debug!("Found matching credential with date_of_issue: {}", date)
            }
            (None, CredentialSelection::DateOfIssue(date)) => {
                warn!("No credential found with date_of_issue: {}", date)
            }
            (None, CredentialSelection::First) => {
                warn!("No credentials offered for proof {}", proof_id)
            }
            _ => {}
        }
        Ok(selected)
    }

    /// Holder presents `credential_id` for the id-number attribute
    pub async fn accept_proof_request(
        &self,
        holder_token: &str,
        proof_id: &str,
        credential_id: &str,
    ) -> HttpResult<()> {
        let body = json!({
            "type": "anoncreds",
            "proof_id": proof_id,
            "anoncreds_presentation_spec": {
                "requested_attributes": {
                    "get_id_number": { "cred_id": credential_id, "revealed": true },
                },
                "requested_predicates": {},
                "self_attested_attributes": {},
            },
            "diff_presentation_spec": {},
        });
        self.post_json(
            "tenant/v1/verifier/accept-request",
            &tenant_headers(holder_token)?,
            &body,
            None,
        )
        .await?
        .ensure_success("accept proof request")?;
        Ok(())
    }

    /// Verifier-side proof record on `thread_id`
    pub async fn proof(
        &self,
        issuer_token: &str,
        thread_id: &str,
    ) -> HttpResult<Option<ProofRecord>> {
        Ok(self
            .proofs_by_thread(issuer_token, thread_id)
            .await?
            .into_iter()
            .next())
    }
}
