use super::{prepared, RETRIES, RETRY_DELAY};
use crate::checks::Threshold;
use crate::driver::Phase;
use crate::error::ScenarioResult;
use crate::harness::Harness;
use async_trait::async_trait;
use std::time::Duration;
use surge_events::Topic;
use surge_phase::{
    shuffled, CredentialRecord, EpochRecord, ExecutionContext, InvitationRecord, PhaseFile,
    PhaseWriter,
};
use surge_resilience::retry;
use tracing::info;

const CREATE_CREDENTIALS: &str = "create-credentials";
pub(crate) const EPOCH_TIMESTAMPS: &str = "epoch-timestamps";

/// Issues one credential over each connection from create-invitation.
///
/// Every credential carries the run's epoch timestamp as `date_of_issue`,
/// which create-proof later uses to pick the right credential.
#[derive(Default)]
pub struct CreateCredentials {
    connections: Vec<InvitationRecord>,
    date_of_issue: String,
    writer: Option<PhaseWriter>,
}

#[async_trait]
impl Phase for CreateCredentials {
    fn name(&self) -> &'static str {
        CREATE_CREDENTIALS
    }

    fn threshold(&self) -> Threshold {
        Threshold::Above(0.99)
    }

    fn input(&self, harness: &Harness) -> Option<PhaseFile> {
        Some(harness.paired_file("create-invitation"))
    }

    async fn setup(&mut self, harness: &Harness) -> ScenarioResult<()> {
        self.writer = Some(
            harness
                .paired_file(CREATE_CREDENTIALS)
                .create_writer()
                .await?,
        );

        let epoch_timestamp = chrono::Utc::now().timestamp();
        harness
            .paired_file(EPOCH_TIMESTAMPS)
            .create_writer()
            .await?
            .append(&EpochRecord { epoch_timestamp })
            .await?;
        self.date_of_issue = epoch_timestamp.to_string();
        info!("Issuing with date_of_issue {}", self.date_of_issue);

        let connections = harness
            .paired_file("create-invitation")
            .read_records()
            .await?;
        self.connections = shuffled(connections, harness.config.test.shuffle);
        Ok(())
    }

    async fn iterate(&self, harness: &Harness, ctx: ExecutionContext) -> ScenarioResult<()> {
        let writer = prepared(&self.writer, "credential output")?;
        let connection = ctx.record(&self.connections)?;
        let api = &harness.api;
        let checks = &harness.checks;

        let issuer_token = connection.issuer_access_token.as_str();
        let definition_id = connection.issuer_credential_definition_id.as_str();
        let issuer_connection_id = connection.issuer_connection_id.as_str();
        let date_of_issue = self.date_of_issue.as_str();

        let exchange = checks.require_ok(
            "credential offered",
            retry(
                move || {
                    api.create_credential(
                        issuer_token,
                        definition_id,
                        issuer_connection_id,
                        date_of_issue,
                    )
                },
                RETRIES,
                Duration::from_secs(5),
                "create credential",
            )
            .await,
        )?;

        let offer = harness
            .event(
                &connection.access_token,
                &connection.wallet_id,
                Topic::Credentials,
                "thread_id",
                &exchange.thread_id,
                "offer-received",
            )?
            .with_tag("credential_offer_received");
        harness
            .poll_and_check("holder received offer", offer)
            .await?;

        let holder_token = connection.access_token.as_str();
        let holder_exchange = api
            .credential_exchange_id_by_thread(holder_token, &exchange.thread_id)
            .await?;
        let holder_exchange = checks.require_some("holder exchange found", holder_exchange)?;

        let holder_exchange_id = holder_exchange.as_str();
        checks.require_ok(
            "credential accepted",
            retry(
                move || api.accept_credential(holder_token, holder_exchange_id),
                RETRIES,
                RETRY_DELAY,
                "accept credential",
            )
            .await,
        )?;

        let done = harness
            .event(
                holder_token,
                &connection.wallet_id,
                Topic::Credentials,
                "credential_exchange_id",
                &holder_exchange,
                "done",
            )?
            .with_tag("credential_done");
        harness
            .poll_and_check("holder credential stored", done)
            .await?;

        writer
            .append(&CredentialRecord {
                issuer_wallet_name: connection.issuer_wallet_name.clone(),
                issuer_wallet_id: connection.issuer_wallet_id.clone(),
                credential_exchange_id: exchange.credential_exchange_id,
                issuer_access_token: connection.issuer_access_token.clone(),
                issuer_credential_definition_id: connection.issuer_credential_definition_id.clone(),
                issuer_connection_id: connection.issuer_connection_id.clone(),
                date_of_issue: self.date_of_issue.clone(),
            })
            .await?;
        Ok(())
    }
}

/// Epoch the issuance run stamped, if create-credentials ran
pub(crate) async fn issued_epoch(file: &PhaseFile) -> ScenarioResult<Option<i64>> {
    if !file.exists().await {
        return Ok(None);
    }
    let records: Vec<EpochRecord> = file.read_records().await?;
    Ok(records.first().map(|r| r.epoch_timestamp))
}
