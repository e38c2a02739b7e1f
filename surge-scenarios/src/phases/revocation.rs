//! revoke-credentials and publish-revoke

use super::prepared;
use crate::checks::Threshold;
use crate::driver::Phase;
use crate::error::{ScenarioError, ScenarioResult};
use crate::harness::Harness;
use async_trait::async_trait;
use std::collections::HashSet;
use std::time::Duration;
use surge_http::PublishOutcome;
use surge_phase::{CredentialRecord, ExecutionContext, PhaseFile};
use surge_resilience::retry;
use tracing::{debug, info};

const CREATE_CREDENTIALS: &str = "create-credentials";
const REVOKED: &str = "revoked";

#[derive(Default)]
pub struct RevokeCredentials {
    credentials: Vec<CredentialRecord>,
}

#[async_trait]
impl Phase for RevokeCredentials {
    fn name(&self) -> &'static str {
        "revoke-credentials"
    }

    fn threshold(&self) -> Threshold {
        Threshold::All
    }

    fn input(&self, harness: &Harness) -> Option<PhaseFile> {
        Some(harness.paired_file(CREATE_CREDENTIALS))
    }

    async fn setup(&mut self, harness: &Harness) -> ScenarioResult<()> {
        self.credentials = harness
            .paired_file(CREATE_CREDENTIALS)
            .read_records()
            .await?;
        Ok(())
    }

    async fn iterate(&self, harness: &Harness, ctx: ExecutionContext) -> ScenarioResult<()> {
        let credential = ctx.record(&self.credentials)?;
        let auto_publish = harness.config.test.use_auto_publish;
        let api = &harness.api;

        harness.checks.require_ok(
            "credential revoked",
            api.revoke_credential(
                &credential.issuer_access_token,
                &credential.credential_exchange_id,
                auto_publish,
            )
            .await,
        )?;

        if auto_publish {
            let state = api
                .revocation_state(
                    &credential.issuer_access_token,
                    &credential.credential_exchange_id,
                )
                .await?;
            harness
                .checks
                .require("revocation published", state.as_deref() == Some(REVOKED))?;
        }
        Ok(())
    }
}

/// Publishes pending revocations once per issuer in setup, then confirms
/// every credential's revocation record
#[derive(Default)]
pub struct PublishRevoke {
    credentials: Vec<CredentialRecord>,
    published: Option<usize>,
}

/// Distinct issuer tokens in first-seen order
pub(crate) fn unique_issuer_tokens(credentials: &[CredentialRecord]) -> Vec<&str> {
    let mut seen = HashSet::new();
    credentials
        .iter()
        .map(|c| c.issuer_access_token.as_str())
        .filter(|token| seen.insert(*token))
        .collect()
}

#[async_trait]
impl Phase for PublishRevoke {
    fn name(&self) -> &'static str {
        "publish-revoke"
    }

    fn threshold(&self) -> Threshold {
        Threshold::Above(0.99)
    }

    fn input(&self, harness: &Harness) -> Option<PhaseFile> {
        Some(harness.paired_file(CREATE_CREDENTIALS))
    }

    async fn setup(&mut self, harness: &Harness) -> ScenarioResult<()> {
        self.credentials = harness
            .paired_file(CREATE_CREDENTIALS)
            .read_records()
            .await?;
        let fire_and_forget = harness.config.test.fire_and_forget_revocation;

        let tokens = unique_issuer_tokens(&self.credentials);
        info!(
            "Publishing revocations for {} issuers across {} credentials",
            tokens.len(),
            self.credentials.len()
        );
        for (index, token) in tokens.iter().enumerate() {
            let outcome = harness.api.publish_revocations(token, fire_and_forget).await?;
            if outcome == PublishOutcome::Dispatched {
                debug!("Publish for issuer {} dispatched without confirmation", index);
            }
        }
        self.published = Some(tokens.len());
        Ok(())
    }

    async fn iterate(&self, harness: &Harness, ctx: ExecutionContext) -> ScenarioResult<()> {
        prepared(&self.published, "published issuers")?;
        let credential = ctx.record(&self.credentials)?;
        let api = &harness.api;
        let token = credential.issuer_access_token.as_str();
        let exchange_id = credential.credential_exchange_id.as_str();

        let confirmed = retry(
            move || async move {
                match api.revocation_state(token, exchange_id).await? {
                    Some(state) if state == REVOKED => Ok(state),
                    other => Err(ScenarioError::missing(format!(
                        "revoked state for {} (currently {:?})",
                        exchange_id, other
                    ))),
                }
            },
            3,
            Duration::from_secs(2),
            "check revocation record",
        )
        .await;
        harness
            .checks
            .require_ok("revocation confirmed", confirmed)
            .map(|_| ())
    }
}
