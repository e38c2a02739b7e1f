use super::prepared;
use crate::checks::Threshold;
use crate::driver::Phase;
use crate::error::ScenarioResult;
use crate::harness::Harness;
use async_trait::async_trait;
use surge_phase::{ExecutionContext, PhaseFile, PhaseWriter, SchemaRecord};

const CREATE_SCHEMAS: &str = "create-schemas";

/// Creates one fresh schema per slot: `<prefix>_<i>` at version `0.0.<i>`
#[derive(Default)]
pub struct CreateSchemas {
    writer: Option<PhaseWriter>,
}

impl CreateSchemas {
    fn output(harness: &Harness) -> PhaseFile {
        PhaseFile::new(
            &harness.config.test.output_dir,
            &harness.config.schema.prefix,
            CREATE_SCHEMAS,
        )
    }
}

#[async_trait]
impl Phase for CreateSchemas {
    fn name(&self) -> &'static str {
        CREATE_SCHEMAS
    }

    fn threshold(&self) -> Threshold {
        Threshold::All
    }

    async fn setup(&mut self, harness: &Harness) -> ScenarioResult<()> {
        self.writer = Some(Self::output(harness).create_writer().await?);
        Ok(())
    }

    async fn iterate(&self, harness: &Harness, ctx: ExecutionContext) -> ScenarioResult<()> {
        let writer = prepared(&self.writer, "schema output")?;
        let index = ctx.wallet_index();
        let schema_name = format!("{}_{}", harness.config.schema.prefix, index);
        let schema_version = format!("0.0.{}", index);
        let governance = &harness.auth.governance;
        let api = &harness.api;

        let existing = api
            .schema_id(governance, &schema_name, &schema_version)
            .await?;
        harness.checks.require("schema not yet defined", existing.is_none())?;

        harness.checks.require_ok(
            "schema created",
            api.create_schema(governance, &schema_name, &schema_version)
                .await,
        )?;

        let schema_id = api
            .schema_id(governance, &schema_name, &schema_version)
            .await?;
        let schema_id = harness.checks.require_some("schema retrievable", schema_id)?;

        writer
            .append(&SchemaRecord {
                schema_name,
                schema_version,
                schema_id,
            })
            .await?;
        Ok(())
    }
}
