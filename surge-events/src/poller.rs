//! Bounded polling for asynchronous events

use crate::parse::{parse_body, EventBody};
use crate::request::PollRequest;
use crate::source::EventSource;
use surge_resilience::BackoffCalculator;
use tracing::{debug, error, info, warn};

/// Polls an [`EventSource`] until the requested event shows up or attempts run out
pub struct EventPoller<S> {
    source: S,
    backoff: BackoffCalculator,
}

impl<S: EventSource> EventPoller<S> {
    /// Poller on the default 0.5s, 1s, 2s, 3s... schedule
    pub fn new(source: S) -> Self {
        Self::with_backoff(source, BackoffCalculator::default())
    }

    pub fn with_backoff(source: S, backoff: BackoffCalculator) -> Self {
        Self { source, backoff }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Wait for `(topic, state)` on the request's key.
    ///
    /// Every failure mode is a transient miss. The first miss is silent,
    /// later misses warn and the final one logs at error. Delays fall
    /// between attempts only.
    pub async fn poll_for_event(&self, request: &PollRequest) -> bool {
        if let Err(e) = request.validate() {
            error!("Refusing to poll {}: {}", request.label(), e);
            return false;
        }

        let label = request.label();
        let topic = request.topic.as_str();
        let max_attempts = request.max_attempts;

        for attempt in 1..=max_attempts {
            let miss = match self.source.fetch(request).await {
                Ok(response) if response.is_success() => match parse_body(&response.body) {
                    body if body.matches(topic, &request.state) => {
                        if attempt == 1 {
                            debug!("Observed {} on first attempt", label);
                        } else {
                            info!("Observed {} on attempt {}/{}", label, attempt, max_attempts);
                        }
                        return true;
                    }
                    EventBody::Unparseable(body) => format!("unparseable body: {}", body),
                    _ => format!("no matching event in: {}", response.body.trim()),
                },
                Ok(response) => format!("status {}: {}", response.status, response.body),
                Err(e) => e.to_string(),
            };

            if attempt == max_attempts {
                error!(
                    "Gave up waiting for {} after {} attempts, last miss: {}",
                    label, max_attempts, miss
                );
            } else {
                if attempt > 1 {
                    warn!("Attempt {}/{} for {} missed: {}", attempt, max_attempts, label, miss);
                }
                tokio::time::sleep(self.backoff.calculate_delay(attempt)).await;
            }
        }

        false
    }
}
