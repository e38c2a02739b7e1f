use crate::client::{tenant_headers, CloudApi};
use crate::errors::{HttpError, HttpResult};
use crate::types::{str_field, Connection, Invitation};
use serde_json::{json, Value};

impl CloudApi {
    /// Issuer's public DID
    pub async fn issuer_public_did(&self, issuer_token: &str) -> HttpResult<String> {
        let body: Value = self
            .get("tenant/v1/wallet/dids/public", &tenant_headers(issuer_token)?, None)
            .await?
            .ensure_success("get public DID")?
            .json()?;
        str_field(&body, "did").ok_or(HttpError::MissingField {
            action: "get public DID",
            field: "did",
        })
    }

    /// Out-of-band invitation created by the issuer
    pub async fn create_invitation(&self, issuer_token: &str) -> HttpResult<Invitation> {
        let body: Value = self
            .post_empty("tenant/v1/oob/create-invitation", &tenant_headers(issuer_token)?)
            .await?
            .ensure_success("create invitation")?
            .json()?;
        body.get("invitation").cloned().ok_or(HttpError::MissingField {
            action: "create invitation",
            field: "invitation",
        })
    }

    /// Holder accepts an OOB invitation
    pub async fn accept_invitation(
        &self,
        holder_token: &str,
        invitation: &Invitation,
    ) -> HttpResult<Connection> {
        let body = json!({
            "alias": "holder <> issuer",
            "invitation": invitation,
        });
        self.post_json(
            "tenant/v1/oob/accept-invitation",
            &tenant_headers(holder_token)?,
            &body,
            None,
        )
        .await?
        .ensure_success("accept invitation")?
        .json()
    }

    /// Holder starts a DID exchange with the issuer's public DID
    pub async fn create_did_exchange_request(
        &self,
        holder_token: &str,
        their_public_did: &str,
    ) -> HttpResult<Connection> {
        let request = self
            .request(
                reqwest::Method::POST,
                "tenant/v1/connections/did-exchange/create-request",
                &tenant_headers(holder_token)?,
            )
            .query(&[("their_public_did", their_public_did)]);
        self.execute(request)
            .await?
            .ensure_success("create DID exchange request")?
            .json()
    }

    pub async fn connection(&self, token: &str, connection_id: &str) -> HttpResult<Connection> {
        self.get(
            &format!("tenant/v1/connections/{}", connection_id),
            &tenant_headers(token)?,
            None,
        )
        .await?
        .ensure_success("get connection")?
        .json()
    }

    /// Connections whose counterparty DID is `their_did`
    pub async fn connections_by_their_did(
        &self,
        token: &str,
        their_did: &str,
    ) -> HttpResult<Vec<Connection>> {
        self.get_query(
            "tenant/v1/connections",
            &tenant_headers(token)?,
            &[("their_did", their_did)],
        )
        .await?
        .ensure_success("get connections")?
        .json()
    }
}

/// Qualified DID without fragment parts: the first three `:` segments
pub fn short_did(full_did: &str) -> String {
    full_did.split(':').take(3).collect::<Vec<_>>().join(":")
}
