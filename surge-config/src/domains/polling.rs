//! Event confirmation polling defaults

use crate::error::ConfigResult;
use crate::validation::{validate_positive, Validatable, ValidationReport};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Attempts before an event wait gives up
    pub max_attempts: u32,

    /// Seconds of event history the backend searches
    pub look_back: u64,

    /// Timeout for each status query
    #[serde(with = "crate::domains::utils::serde_duration")]
    pub request_timeout: Duration,

    /// Delays between attempts in milliseconds; the last entry repeats
    pub backoff_ms: Vec<u64>,

    /// Hold the status endpoint open as an event stream instead of polling it
    pub use_stream: bool,

    /// Stream reconnects after the first connection
    pub stream_max_retries: u32,

    /// Pause before each stream reconnect
    #[serde(with = "crate::domains::utils::serde_duration")]
    pub stream_retry_delay: Duration,

    /// Consecutive keep-alive frames tolerated before a stream wait gives up
    pub stream_max_empty_pings: u32,

    /// Lifetime of a single stream connection
    #[serde(with = "crate::domains::utils::serde_duration")]
    pub stream_connection_timeout: Duration,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            look_back: 60,
            request_timeout: Duration::from_secs(14),
            backoff_ms: vec![500, 1000, 2000, 3000],
            use_stream: false,
            stream_max_retries: 5,
            stream_retry_delay: Duration::from_secs(2),
            stream_max_empty_pings: 3,
            stream_connection_timeout: Duration::from_secs(29),
        }
    }
}

impl Validatable for PollingConfig {
    fn validate(&self) -> ConfigResult<()> {
        let domain = self.domain_name();
        let mut report = ValidationReport::new();
        report.check(validate_positive(self.max_attempts, "max_attempts", domain));
        report.check(validate_positive(
            self.request_timeout.as_secs(),
            "request_timeout",
            domain,
        ));
        report.check(validate_positive(
            self.stream_max_empty_pings,
            "stream_max_empty_pings",
            domain,
        ));
        report.check(validate_positive(
            self.stream_connection_timeout.as_secs(),
            "stream_connection_timeout",
            domain,
        ));
        if self.backoff_ms.is_empty() {
            report.check(Err(self.validation_error("backoff_ms needs at least one delay")));
        }
        report.finish()
    }

    fn domain_name(&self) -> &'static str {
        "polling"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_settings_reject_zero_pings_and_timeout() {
        let polling = PollingConfig {
            stream_max_empty_pings: 0,
            stream_connection_timeout: Duration::ZERO,
            ..PollingConfig::default()
        };
        let err = polling.validate().unwrap_err();
        let messages = err.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("stream_max_empty_pings"));
        assert!(messages[1].contains("stream_connection_timeout"));
    }

    #[test]
    fn test_stream_settings_from_yaml() {
        let yaml = "stream_max_retries: 1\nstream_connection_timeout: 45s\n";
        let polling: PollingConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(polling.stream_max_retries, 1);
        assert_eq!(polling.stream_connection_timeout, Duration::from_secs(45));
        assert_eq!(polling.stream_max_empty_pings, 3);
    }
}
