//! Holder wallet lifecycle: create-holders and delete-holders

use super::{prepared, seed_names};
use crate::checks::Threshold;
use crate::driver::Phase;
use crate::error::{ScenarioError, ScenarioResult};
use crate::harness::Harness;
use async_trait::async_trait;
use surge_http::NewTenant;
use surge_phase::{ExecutionContext, PhaseWriter, TenantRecord};
use tracing::{debug, info, warn};

const CREATE_HOLDERS: &str = "create-holders";

#[derive(Default)]
pub struct CreateHolders {
    writer: Option<PhaseWriter>,
}

#[async_trait]
impl Phase for CreateHolders {
    fn name(&self) -> &'static str {
        CREATE_HOLDERS
    }

    fn threshold(&self) -> Threshold {
        Threshold::All
    }

    async fn setup(&mut self, harness: &Harness) -> ScenarioResult<()> {
        self.writer = Some(harness.holder_file(CREATE_HOLDERS).create_writer().await?);
        Ok(())
    }

    async fn iterate(&self, harness: &Harness, ctx: ExecutionContext) -> ScenarioResult<()> {
        let writer = prepared(&self.writer, "holder output")?;
        let index = ctx.wallet_index();
        let (wallet_label, wallet_name) = seed_names(&harness.config.test.holder_prefix, index);

        let tenant = harness.checks.require_ok(
            "holder tenant created",
            harness
                .api
                .create_tenant(
                    &harness.auth.tenant_admin,
                    &NewTenant::holder(&wallet_label, &wallet_name),
                )
                .await,
        )?;
        let access_token = tenant
            .access_token
            .ok_or_else(|| ScenarioError::missing("access_token in create tenant response"))?;
        debug!("Wallet index: {}, wallet id: {}", index, tenant.wallet_id);

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

/// Looks holders up by their seeded names, so it needs no input file
pub struct DeleteHolders;

#[async_trait]
impl Phase for DeleteHolders {
    fn name(&self) -> &'static str {
        "delete-holders"
    }

    fn threshold(&self) -> Threshold {
        Threshold::None
    }

    async fn setup(&mut self, _harness: &Harness) -> ScenarioResult<()> {
        Ok(())
    }

    async fn iterate(&self, harness: &Harness, ctx: ExecutionContext) -> ScenarioResult<()> {
        let (_, wallet_name) = seed_names(&harness.config.test.holder_prefix, ctx.wallet_index());
        let admin = &harness.auth.tenant_admin;

        let wallet_id = harness.api.wallet_id_by_name(admin, &wallet_name).await?;
        let wallet_id = harness.checks.require_some("holder found", wallet_id)?;
        harness
            .checks
            .require_ok("holder deleted", harness.api.delete_tenant(admin, &wallet_id).await)
    }

    async fn teardown(&self, harness: &Harness) -> ScenarioResult<()> {
        let file = harness.holder_file(CREATE_HOLDERS);
        match file.remove().await {
            Ok(true) => info!("Removed {}", file.path().display()),
            Ok(false) => {}
            Err(e) => warn!("Could not remove holder file: {}", e),
        }
        Ok(())
    }
}
