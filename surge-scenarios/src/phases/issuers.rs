use super::{prepared, seed_names};
use crate::checks::Threshold;
use crate::driver::Phase;
use crate::error::{ScenarioError, ScenarioResult};
use crate::harness::Harness;
use async_trait::async_trait;
use surge_phase::{ExecutionContext, PhaseWriter, TenantRecord};

const CREATE_ISSUERS: &str = "create-issuers";

/// Provisions issuer wallets and checks each one is on the trust registry
#[derive(Default)]
pub struct CreateIssuers {
    writer: Option<PhaseWriter>,
}

#[async_trait]
impl Phase for CreateIssuers {
    fn name(&self) -> &'static str {
        CREATE_ISSUERS
    }

    fn threshold(&self) -> Threshold {
        Threshold::All
    }

    async fn setup(&mut self, harness: &Harness) -> ScenarioResult<()> {
        self.writer = Some(harness.issuer_file(CREATE_ISSUERS).create_writer().await?);
        Ok(())
    }

    async fn iterate(&self, harness: &Harness, ctx: ExecutionContext) -> ScenarioResult<()> {
        let writer = prepared(&self.writer, "issuer output")?;
        let (wallet_label, wallet_name) =
            seed_names(&harness.config.test.issuer_prefix, ctx.wallet_index());

        let tenant = harness.checks.require_ok(
            "issuer tenant created",
            harness
                .api
                .create_issuer_tenant(&harness.auth.tenant_admin, &wallet_name)
                .await,
        )?;

        let actor = harness.api.trust_registry_actor(&wallet_name).await;
        harness
            .checks
            .check("issuer on trust registry", matches!(actor, Ok(Some(_))));

        let access_token = tenant
            .access_token
            .ok_or_else(|| ScenarioError::missing("access_token in create issuer response"))?;
        writer
            .append(&TenantRecord {
                wallet_label,
                wallet_name,
                wallet_id: tenant.wallet_id,
                access_token,
            })
            .await?;
        Ok(())
    }
}
