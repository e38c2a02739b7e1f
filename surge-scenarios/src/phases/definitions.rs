use super::prepared;
use crate::checks::Threshold;
use crate::driver::Phase;
use crate::error::ScenarioResult;
use crate::harness::Harness;
use async_trait::async_trait;
use surge_phase::{
    CredentialDefinitionRecord, ExecutionContext, PhaseFile, PhaseWriter, TenantRecord,
};
use tracing::debug;

const CREATE_CREDDEF: &str = "create-creddef";

/// One credential definition per issuer from create-issuers, tagged with the
/// issuer's wallet name and bound to the configured schema
#[derive(Default)]
pub struct CreateCredentialDefinitions {
    issuers: Vec<TenantRecord>,
    schema_id: Option<String>,
    writer: Option<PhaseWriter>,
}

#[async_trait]
impl Phase for CreateCredentialDefinitions {
    fn name(&self) -> &'static str {
        CREATE_CREDDEF
    }

    fn threshold(&self) -> Threshold {
        Threshold::All
    }

    fn input(&self, harness: &Harness) -> Option<PhaseFile> {
        Some(harness.issuer_file("create-issuers"))
    }

    async fn setup(&mut self, harness: &Harness) -> ScenarioResult<()> {
        self.issuers = harness.issuer_file("create-issuers").read_records().await?;

        let schema = &harness.config.schema;
        let schema_id = harness
            .api
            .ensure_schema(&harness.auth.governance, &schema.name, &schema.version)
            .await?;
        debug!("Binding credential definitions to schema {}", schema_id);
        self.schema_id = Some(schema_id);

        self.writer = Some(harness.issuer_file(CREATE_CREDDEF).create_writer().await?);
        Ok(())
    }

    async fn iterate(&self, harness: &Harness, ctx: ExecutionContext) -> ScenarioResult<()> {
        let writer = prepared(&self.writer, "credential definition output")?;
        let schema_id = prepared(&self.schema_id, "schema id")?;
        let issuer = ctx.record(&self.issuers)?;

        let credential_definition_id = harness.checks.require_ok(
            "credential definition created",
            harness
                .api
                .create_credential_definition(&issuer.access_token, &issuer.wallet_name, schema_id)
                .await,
        )?;

        writer
            .append(&CredentialDefinitionRecord {
                wallet_name: issuer.wallet_name.clone(),
                wallet_id: issuer.wallet_id.clone(),
                credential_definition_id,
            })
            .await?;
        Ok(())
    }
}
