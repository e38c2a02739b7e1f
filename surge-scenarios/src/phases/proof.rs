use super::credentials::{issued_epoch, EPOCH_TIMESTAMPS};
use crate::checks::Threshold;
use crate::driver::Phase;
use crate::error::{ScenarioError, ScenarioResult};
use crate::harness::Harness;
use async_trait::async_trait;
use surge_config::ProofSelection;
use surge_events::Topic;
use surge_http::CredentialSelection;
use surge_phase::{ExecutionContext, InvitationRecord, PhaseFile};
use tracing::info;

/// Issuer requests a proof over each connection; the holder presents and the
/// issuer checks the verification result.
///
/// The presented credential is the first one listed unless the run selects by
/// `date_of_issue`, in which case create-credentials must have recorded the
/// epoch it issued with.
///
/// Proofs must verify unless the run is configured for revoked credentials.
#[derive(Default)]
pub struct CreateProof {
    connections: Vec<InvitationRecord>,
    selection: CredentialSelection,
}

#[async_trait]
impl Phase for CreateProof {
    fn name(&self) -> &'static str {
        "create-proof"
    }

    fn threshold(&self) -> Threshold {
        Threshold::Above(0.99)
    }

    fn input(&self, harness: &Harness) -> Option<PhaseFile> {
        Some(harness.paired_file("create-invitation"))
    }

    async fn setup(&mut self, harness: &Harness) -> ScenarioResult<()> {
        self.connections = harness
            .paired_file("create-invitation")
            .read_records()
            .await?;
        self.selection = credential_selection(harness).await?;
        info!("Presenting credentials selected by {:?}", self.selection);
        Ok(())
    }

    async fn iterate(&self, harness: &Harness, ctx: ExecutionContext) -> ScenarioResult<()> {
        let connection = ctx.record(&self.connections)?;
        let api = &harness.api;
        let checks = &harness.checks;
        let issuer_token = connection.issuer_access_token.as_str();
        let holder_token = connection.access_token.as_str();

        let exchange = checks.require_ok(
            "proof requested",
            api.send_proof_request(issuer_token, &connection.issuer_connection_id)
                .await,
        )?;
        let thread_id = exchange.thread_id.as_str();

        let received = harness
            .event(
                holder_token,
                &connection.wallet_id,
                Topic::Proofs,
                "thread_id",
                thread_id,
                "request-received",
            )?
            .with_tag("proof_request_received");
        harness
            .poll_and_check("holder received proof request", received)
            .await?;

        let proof_id = api.proof_id_by_thread(holder_token, thread_id).await?;
        let proof_id = checks.require_some("holder proof found", proof_id)?;

        let credential_id = api
            .proof_credential_id(holder_token, &proof_id, &self.selection)
            .await?;
        let credential_id = checks.require_some("credential selected", credential_id)?;

        checks.require_ok(
            "proof presented",
            api.accept_proof_request(holder_token, &proof_id, &credential_id)
                .await,
        )?;

        let done = harness
            .event(
                issuer_token,
                &connection.issuer_wallet_id,
                Topic::Proofs,
                "thread_id",
                thread_id,
                "done",
            )?
            .with_tag("proof_done");
        harness.poll_and_check("issuer proof done", done).await?;

        let proof = api.proof(issuer_token, thread_id).await?;
        let proof = checks.require_some("proof retrieved", proof)?;

        let expect_verified = !harness.config.test.is_revoked;
        let name = if expect_verified {
            "proof verified"
        } else {
            "proof rejected for revoked credential"
        };
        checks.require(name, proof.verified == Some(expect_verified))
    }
}

async fn credential_selection(harness: &Harness) -> ScenarioResult<CredentialSelection> {
    match harness.config.test.proof_selection {
        ProofSelection::First => Ok(CredentialSelection::First),
        ProofSelection::DateOfIssue => {
            let epochs = harness.paired_file(EPOCH_TIMESTAMPS);
            match issued_epoch(&epochs).await? {
                Some(epoch) => Ok(CredentialSelection::DateOfIssue(epoch.to_string())),
                None => Err(ScenarioError::missing(format!(
                    "{} (date_of_issue selection needs the issued epoch)",
                    epochs.path().display()
                ))),
            }
        }
    }
}
