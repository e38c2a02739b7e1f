//! Everything a phase needs to talk to the backend

use crate::checks::Checks;
use crate::error::ScenarioResult;
use surge_config::SurgeConfig;
use surge_events::{EventPoller, PollRequest, StreamListener, StreamSettings, Topic};
use surge_http::{AuthHeaders, AuthMode, CloudApi};
use surge_phase::PhaseFile;
use surge_resilience::BackoffCalculator;
use tracing::info;

/// Shared, read-only run context handed to every phase callback
pub struct Harness {
    pub config: SurgeConfig,
    pub api: CloudApi,
    pub auth: AuthHeaders,
    pub checks: Checks,
    waiter: EventWaiter,
}

/// How event waits reach the status endpoint for this run
enum EventWaiter {
    Poll(EventPoller<CloudApi>),
    Stream(StreamListener),
}

impl Harness {
    /// Build the client and resolve admin credentials once for the run
    pub async fn connect(config: SurgeConfig) -> ScenarioResult<Self> {
        let api = CloudApi::new(&config.api)?;
        let auth = AuthMode::from_config(&config.auth)?.resolve(&api).await?;
        info!("Connected to {}", api.base_url());
        Ok(Self::new(config, api, auth))
    }

    pub fn new(config: SurgeConfig, api: CloudApi, auth: AuthHeaders) -> Self {
        let waiter = if config.polling.use_stream {
            info!("Waiting for events on the live stream");
            let settings = StreamSettings::from_polling(&config.polling);
            EventWaiter::Stream(StreamListener::with_settings(api.clone(), settings))
        } else {
            let backoff = BackoffCalculator::schedule(config.polling.backoff_ms.clone());
            EventWaiter::Poll(EventPoller::with_backoff(api.clone(), backoff))
        };
        Self {
            config,
            api,
            auth,
            checks: Checks::new(),
            waiter,
        }
    }

    /// `<holder_prefix>-<phase>.jsonl`
    pub fn holder_file(&self, phase: &str) -> PhaseFile {
        PhaseFile::new(
            &self.config.test.output_dir,
            &self.config.test.holder_prefix,
            phase,
        )
    }

    /// `<issuer_prefix>-<phase>.jsonl`
    pub fn issuer_file(&self, phase: &str) -> PhaseFile {
        PhaseFile::new(
            &self.config.test.output_dir,
            &self.config.test.issuer_prefix,
            phase,
        )
    }

    /// `<issuer_prefix>-<holder_prefix>-<phase>.jsonl`
    pub fn paired_file(&self, phase: &str) -> PhaseFile {
        PhaseFile::paired(
            &self.config.test.output_dir,
            &self.config.test.issuer_prefix,
            &self.config.test.holder_prefix,
            phase,
        )
    }

    /// Event wait request using the configured polling settings
    pub fn event(
        &self,
        access_token: &str,
        wallet_id: &str,
        topic: Topic,
        field: &str,
        field_id: &str,
        state: &str,
    ) -> ScenarioResult<PollRequest> {
        Ok(
            PollRequest::new(access_token, wallet_id, topic, field, field_id, state)?
                .with_polling(&self.config.polling),
        )
    }

    /// Wait for an event and record the outcome under `check`; a miss ends the iteration
    pub async fn poll_and_check(&self, check: &str, request: PollRequest) -> ScenarioResult<()> {
        let observed = match &self.waiter {
            EventWaiter::Poll(poller) => poller.poll_for_event(&request).await,
            EventWaiter::Stream(listener) => listener.wait_for_event(&request).await,
        };
        self.checks.require(check, observed)
    }
}
