use crate::client::CloudApi;
use crate::errors::HttpResult;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::warn;

impl CloudApi {
    /// Trust-registry entry for an actor; `None` unless the lookup returns 200
    pub async fn trust_registry_actor(&self, actor_name: &str) -> HttpResult<Option<Value>> {
        let response = self
            .get_query(
                "public/v1/trust-registry/actors",
                &HeaderMap::new(),
                &[("actor_name", actor_name)],
            )
            .await?;

        if response.status != StatusCode::OK {
            warn!(
                "Issuer not on Trust Registry: actor_name {} ({})",
                actor_name, response.status
            );
            return Ok(None);
        }
        Ok(Some(response.json()?))
    }
}
