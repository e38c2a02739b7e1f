use crate::client::CloudApi;
use crate::errors::{HttpError, HttpResult};
use crate::types::{first_item, str_field, AccessToken, NewTenant, Tenant};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, info, warn};

const TENANTS: &str = "tenant-admin/v1/tenants";

impl CloudApi {
    /// Create a tenant wallet; only 200 counts as success
    pub async fn create_tenant(
        &self,
        admin: &HeaderMap,
        tenant: &NewTenant<'_>,
    ) -> HttpResult<Tenant> {
        self.post_json(TENANTS, admin, tenant, None)
            .await?
            .ensure_status("create tenant", StatusCode::OK)?
            .json()
    }

    /// Create an issuer tenant with issuer and verifier roles
    pub async fn create_issuer_tenant(
        &self,
        admin: &HeaderMap,
        wallet_name: &str,
    ) -> HttpResult<Tenant> {
        self.post_json(TENANTS, admin, &NewTenant::issuer(wallet_name), None)
            .await?
            .ensure_success("create issuer tenant")?
            .json()
    }

    /// Wallet id of the first tenant with `wallet_name`
    pub async fn wallet_id_by_name(
        &self,
        admin: &HeaderMap,
        wallet_name: &str,
    ) -> HttpResult<Option<String>> {
        let response = self
            .get_query(TENANTS, admin, &[("wallet_name", wallet_name)])
            .await?
            .ensure_success("get tenant by name")?;

        let tenants: Value = response.json()?;
        let wallet_id = first_item(&tenants).and_then(|t| str_field(t, "wallet_id"));
        if wallet_id.is_none() {
            warn!("Wallet not found for wallet_name {}", wallet_name);
            debug!("Response body: {}", response.body);
        }
        Ok(wallet_id)
    }

    /// Fresh access token for a tenant wallet
    pub async fn access_token_by_wallet_id(
        &self,
        admin: &HeaderMap,
        wallet_id: &str,
    ) -> HttpResult<Option<String>> {
        debug!("Getting access token for wallet ID: {}", wallet_id);
        let path = format!("{}/{}/access-token", TENANTS, wallet_id);
        let response = self
            .post_json(&path, admin, &serde_json::json!({}), None)
            .await?;
        if !response.is_success() {
            warn!("Access token request for {} failed with status {}", wallet_id, response.status);
            return Ok(None);
        }
        Ok(response.json::<AccessToken>()?.access_token)
    }

    /// Delete a tenant; 200 and 204 both count as success
    pub async fn delete_tenant(&self, admin: &HeaderMap, wallet_id: &str) -> HttpResult<()> {
        let response = self
            .delete(&format!("{}/{}", TENANTS, wallet_id), admin)
            .await?;
        match response.status {
            StatusCode::OK | StatusCode::NO_CONTENT => {
                info!("Wallet {} deleted successfully", wallet_id);
                Ok(())
            }
            _ => Err(response.into_error("delete tenant")),
        }
    }

    /// Look a tenant up by name and create it if absent; returns id and token
    pub async fn ensure_issuer_tenant(
        &self,
        admin: &HeaderMap,
        wallet_name: &str,
    ) -> HttpResult<(String, String)> {
        if let Some(wallet_id) = self.wallet_id_by_name(admin, wallet_name).await? {
            info!("Issuer {} already exists - reusing wallet {}", wallet_name, wallet_id);
            let token = self
                .access_token_by_wallet_id(admin, &wallet_id)
                .await?
                .ok_or(HttpError::MissingField {
                    action: "get access token",
                    field: "access_token",
                })?;
            return Ok((wallet_id, token));
        }

        let tenant = self.create_issuer_tenant(admin, wallet_name).await?;
        let token = tenant.access_token.ok_or(HttpError::MissingField {
            action: "create issuer tenant",
            field: "access_token",
        })?;
        info!("Created issuer {} with wallet {}", wallet_name, tenant.wallet_id);
        Ok((tenant.wallet_id, token))
    }
}
