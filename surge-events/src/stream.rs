//! Long-lived event stream waits
//!
//! Holds a connection open on the streaming status endpoint and scans
//! frames as they arrive. Connections that drop, time out or carry a
//! malformed frame are reopened up to `max_retries` times; a run of empty
//! keep-alive frames ends the wait early.

use crate::parse::{classify_line, event_matches, StreamLine};
use crate::request::PollRequest;
use futures::StreamExt;
use std::time::Duration;
use surge_config::PollingConfig;
use surge_http::{tenant_headers, CloudApi};
use tokio::time::{timeout_at, Instant};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct StreamSettings {
    /// Reconnects after the first connection
    pub max_retries: u32,
    pub retry_delay: Duration,
    /// Consecutive keep-alives tolerated before giving up
    pub max_empty_pings: u32,
    /// Lifetime of a single connection
    pub connection_timeout: Duration,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            max_retries: 5,
            retry_delay: Duration::from_secs(2),
            max_empty_pings: 3,
            connection_timeout: Duration::from_secs(29),
        }
    }
}

impl StreamSettings {
    /// Stream limits from the run's polling configuration
    pub fn from_polling(polling: &PollingConfig) -> Self {
        Self {
            max_retries: polling.stream_max_retries,
            retry_delay: polling.stream_retry_delay,
            max_empty_pings: polling.stream_max_empty_pings,
            connection_timeout: polling.stream_connection_timeout,
        }
    }
}

enum Connection {
    Matched,
    /// Too many keep-alives without data; no point reconnecting
    Idle,
    Dropped(String),
}

pub struct StreamListener {
    api: CloudApi,
    settings: StreamSettings,
}

impl StreamListener {
    pub fn new(api: CloudApi) -> Self {
        Self::with_settings(api, StreamSettings::default())
    }

    pub fn with_settings(api: CloudApi, settings: StreamSettings) -> Self {
        Self { api, settings }
    }

    /// Wait on the stream until the requested event arrives
    pub async fn wait_for_event(&self, request: &PollRequest) -> bool {
        if let Err(e) = request.validate() {
            error!("Refusing to listen for {}: {}", request.label(), e);
            return false;
        }
        let label = request.label();

        for attempt in 0..=self.settings.max_retries {
            if attempt > 0 {
                tokio::time::sleep(self.settings.retry_delay).await;
            }

            match self.listen_once(request).await {
                Connection::Matched => {
                    info!("Observed {} on stream", label);
                    return true;
                }
                Connection::Idle => {
                    warn!(
                        "Stream for {} went idle after {} empty pings",
                        label, self.settings.max_empty_pings
                    );
                    return false;
                }
                Connection::Dropped(reason) if attempt < self.settings.max_retries => {
                    warn!(
                        "Stream for {} dropped ({}), reconnecting {}/{}",
                        label,
                        reason,
                        attempt + 1,
                        self.settings.max_retries
                    );
                }
                Connection::Dropped(reason) => {
                    error!(
                        "Stream for {} failed after {} reconnects: {}",
                        label, self.settings.max_retries, reason
                    );
                }
            }
        }

        false
    }

    async fn listen_once(&self, request: &PollRequest) -> Connection {
        let deadline = Instant::now() + self.settings.connection_timeout;

        let headers = match tenant_headers(&request.access_token) {
            Ok(headers) => headers,
            Err(e) => return Connection::Dropped(e.to_string()),
        };
        let response = match self
            .api
            .open_stream(&request.path(), &headers, self.settings.connection_timeout)
            .await
        {
            Ok(response) => response,
            Err(e) => return Connection::Dropped(e.to_string()),
        };
        if !response.status().is_success() {
            return Connection::Dropped(format!("status {}", response.status()));
        }

        let mut chunks = response.bytes_stream();
        let mut lines = LineBuffer::default();
        let mut empty_pings = 0;

        loop {
            let chunk = match timeout_at(deadline, chunks.next()).await {
                Err(_) => return Connection::Dropped("connection timeout".into()),
                Ok(None) => return Connection::Dropped("stream closed".into()),
                Ok(Some(Err(e))) => return Connection::Dropped(e.to_string()),
                Ok(Some(Ok(chunk))) => chunk,
            };
            lines.push(&chunk);

            while let Some(line) = lines.next_line() {
                match classify_line(&line) {
                    StreamLine::Ping => {
                        empty_pings += 1;
                        debug!("Empty ping {} on {}", empty_pings, request.label());
                        if empty_pings >= self.settings.max_empty_pings {
                            return Connection::Idle;
                        }
                    }
                    StreamLine::Data(data) => {
                        empty_pings = 0;
                        let value: serde_json::Value = match serde_json::from_str(&data) {
                            Ok(value) => value,
                            Err(e) => {
                                return Connection::Dropped(format!("malformed frame: {}", e))
                            }
                        };
                        if event_matches(&value, request.topic.as_str(), &request.state) {
                            return Connection::Matched;
                        }
                    }
                    StreamLine::Other => {}
                }
            }
        }
    }
}

/// Raw stream bytes split at newlines; a line is decoded only once complete,
/// so multi-byte characters may straddle network chunks.
#[derive(Debug, Default)]
struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    fn push(&mut self, chunk: &[u8]) {
        self.pending.extend_from_slice(chunk);
    }

    /// Next complete line without its terminator
    fn next_line(&mut self) -> Option<String> {
        let newline = self.pending.iter().position(|&byte| byte == b'\n')?;
        let line: Vec<u8> = self.pending.drain(..=newline).collect();
        Some(String::from_utf8_lossy(&line[..newline]).into_owned())
    }
}
