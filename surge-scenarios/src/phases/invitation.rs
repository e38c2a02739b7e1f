//! create-invitation: connect each holder to an issuer
//!
//! Holders come from create-holders; issuers are bootstrapped in setup and
//! assigned round-robin. The connection is made by out-of-band invitation or
//! by a DID-exchange request against the issuer's public DID, then confirmed
//! on both sides before the issuer's connection id is looked up.

use super::{prepared, RETRIES, RETRY_DELAY};
use crate::bootstrap::{bootstrap_issuers, IssuerProfile};
use crate::checks::Threshold;
use crate::driver::Phase;
use crate::error::{ScenarioError, ScenarioResult};
use crate::harness::Harness;
use async_trait::async_trait;
use std::time::Duration;
use surge_events::Topic;
use surge_http::short_did;
use surge_phase::{ExecutionContext, InvitationRecord, PhaseFile, PhaseWriter, TenantRecord};
use surge_resilience::retry;
use tracing::{debug, info, warn};

const CREATE_INVITATION: &str = "create-invitation";
/// Gives the issuer side time to index the new connection
const SETTLE: Duration = Duration::from_secs(2);

#[derive(Default)]
pub struct CreateInvitation {
    holders: Vec<TenantRecord>,
    issuers: Vec<IssuerProfile>,
    writer: Option<PhaseWriter>,
}

impl CreateInvitation {
    /// Open the connection from the holder's side; returns the holder's
    /// connection id and full DID
    async fn connect(
        &self,
        harness: &Harness,
        holder: &TenantRecord,
        issuer: &IssuerProfile,
        public_did: &str,
    ) -> ScenarioResult<(String, String)> {
        let api = &harness.api;
        let checks = &harness.checks;
        let issuer_token = issuer.access_token.as_str();
        let holder_token = holder.access_token.as_str();

        if harness.config.test.oob_invitation {
            debug!("Using OOB invitation flow");
            let invitation = checks.require_ok(
                "invitation created",
                retry(
                    move || api.create_invitation(issuer_token),
                    RETRIES,
                    RETRY_DELAY,
                    "create invitation",
                )
                .await,
            )?;
            let connection = checks.require_ok(
                "invitation accepted",
                api.accept_invitation(holder_token, &invitation).await,
            )?;

            let connection_id = connection.connection_id.as_str();
            let holder_side = checks.require_ok(
                "holder DID retrieved",
                retry(
                    move || api.connection(holder_token, connection_id),
                    RETRIES,
                    RETRY_DELAY,
                    "get holder connection",
                )
                .await,
            )?;
            let my_did = holder_side
                .my_did
                .ok_or_else(|| ScenarioError::missing("my_did on holder connection"))?;
            Ok((connection.connection_id, my_did))
        } else {
            debug!("Using DID exchange flow");
            let connection = checks.require_ok(
                "DID exchange requested",
                retry(
                    move || api.create_did_exchange_request(holder_token, public_did),
                    RETRIES,
                    RETRY_DELAY,
                    "create DID exchange request",
                )
                .await,
            )?;
            let my_did = connection
                .my_did
                .ok_or_else(|| ScenarioError::missing("my_did on DID exchange request"))?;
            Ok((connection.connection_id, my_did))
        }
    }
}

#[async_trait]
impl Phase for CreateInvitation {
    fn name(&self) -> &'static str {
        CREATE_INVITATION
    }

    fn threshold(&self) -> Threshold {
        Threshold::Above(0.99)
    }

    fn input(&self, harness: &Harness) -> Option<PhaseFile> {
        Some(harness.holder_file("create-holders"))
    }

    async fn setup(&mut self, harness: &Harness) -> ScenarioResult<()> {
        self.holders = harness.holder_file("create-holders").read_records().await?;
        self.issuers = bootstrap_issuers(harness).await?;
        self.writer = Some(
            harness
                .paired_file(CREATE_INVITATION)
                .create_writer()
                .await?,
        );
        Ok(())
    }

    async fn iterate(&self, harness: &Harness, ctx: ExecutionContext) -> ScenarioResult<()> {
        let writer = prepared(&self.writer, "invitation output")?;
        let holder = ctx.record(&self.holders)?;
        let issuer_index = ctx.issuer_index(self.issuers.len());
        let issuer = self
            .issuers
            .get(issuer_index)
            .ok_or_else(|| ScenarioError::missing(format!("issuer {}", issuer_index)))?;
        debug!(
            "Wallet index: {}, issuer index: {}, issuer wallet: {}",
            ctx.wallet_index(),
            issuer_index,
            issuer.wallet_id
        );

        let api = &harness.api;
        let checks = &harness.checks;
        let issuer_token = issuer.access_token.as_str();

        let public_did = checks.require_ok(
            "issuer public DID retrieved",
            retry(
                move || api.issuer_public_did(issuer_token),
                RETRIES,
                RETRY_DELAY,
                "get issuer public DID",
            )
            .await,
        )?;

        let (connection_id, holder_did) = self.connect(harness, holder, issuer, &public_did).await?;

        let holder_ready = harness
            .event(
                &holder.access_token,
                &holder.wallet_id,
                Topic::Connections,
                "connection_id",
                &connection_id,
                "completed",
            )?
            .with_tag("connection_ready");
        harness
            .poll_and_check("holder connection completed", holder_ready)
            .await?;

        let issuer_ready = harness
            .event(
                issuer_token,
                &issuer.wallet_id,
                Topic::Connections,
                "their_did",
                &holder_did,
                "completed",
            )?
            .with_tag("connection_ready");
        harness
            .poll_and_check("issuer connection completed", issuer_ready)
            .await?;

        tokio::time::sleep(SETTLE).await;

        let their_did = short_did(&holder_did);
        let their_did = their_did.as_str();
        let issuer_connections = checks.require_ok(
            "issuer connection found",
            retry(
                move || async move {
                    let connections = api.connections_by_their_did(issuer_token, their_did).await?;
                    if connections.is_empty() {
                        return Err(ScenarioError::missing(format!(
                            "issuer connection for {}",
                            their_did
                        )));
                    }
                    Ok(connections)
                },
                RETRIES,
                Duration::from_secs(1),
                "get issuer connection id",
            )
            .await,
        )?;
        let issuer_connection_id = issuer_connections
            .into_iter()
            .next()
            .map(|c| c.connection_id)
            .ok_or_else(|| ScenarioError::missing("issuer connection id"))?;

        writer
            .append(&InvitationRecord {
                wallet_label: holder.wallet_label.clone(),
                wallet_name: holder.wallet_name.clone(),
                wallet_id: holder.wallet_id.clone(),
                access_token: holder.access_token.clone(),
                connection_id,
                issuer_connection_id,
                issuer_wallet_name: issuer.wallet_name.clone(),
                issuer_wallet_id: issuer.wallet_id.clone(),
                issuer_access_token: issuer.access_token.clone(),
                issuer_credential_definition_id: issuer.credential_definition_id.clone(),
            })
            .await?;
        Ok(())
    }

    async fn teardown(&self, harness: &Harness) -> ScenarioResult<()> {
        let test = &harness.config.test;
        let admin = &harness.auth.tenant_admin;

        if !test.skip_delete_issuers {
            for issuer in &self.issuers {
                if let Err(e) = harness.api.delete_tenant(admin, &issuer.wallet_id).await {
                    warn!("Could not delete issuer {}: {}", issuer.wallet_name, e);
                }
            }
        }
        if !test.skip_delete_holders {
            for holder in &self.holders {
                if let Err(e) = harness.api.delete_tenant(admin, &holder.wallet_id).await {
                    warn!("Could not delete holder {}: {}", holder.wallet_name, e);
                }
            }
        }
        info!("Teardown of {} finished", CREATE_INVITATION);
        Ok(())
    }
}
