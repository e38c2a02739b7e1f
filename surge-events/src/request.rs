//! What an event wait is looking for

use std::fmt;
use std::time::Duration;
use surge_config::PollingConfig;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EventError {
    #[error("state '{state}' is not a valid {topic} event state")]
    InvalidState { topic: Topic, state: String },

    #[error("event wait needs at least one attempt")]
    NoAttempts,
}

/// Event families the backend reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Connections,
    Credentials,
    Proofs,
    IssuerCredRev,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Connections => "connections",
            Topic::Credentials => "credentials",
            Topic::Proofs => "proofs",
            Topic::IssuerCredRev => "issuer_cred_rev",
        }
    }

    /// States the harness waits for on this topic
    pub fn states(&self) -> &'static [&'static str] {
        match self {
            Topic::Connections => &["completed"],
            Topic::Credentials => &["offer-received", "request-sent", "done"],
            Topic::Proofs => &["request-received", "presentation-sent", "done"],
            Topic::IssuerCredRev => &["revoked"],
        }
    }

    pub fn accepts(&self, state: &str) -> bool {
        self.states().contains(&state)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single "wait until this event is observed" request
#[derive(Debug, Clone)]
pub struct PollRequest {
    pub access_token: String,
    pub wallet_id: String,
    pub topic: Topic,
    /// Field the event is keyed on, e.g. `thread_id`
    pub field: String,
    pub field_id: String,
    pub state: String,
    /// Seconds of history the backend searches
    pub look_back: u64,
    pub max_attempts: u32,
    pub request_timeout: Duration,
    /// Free-form label for log lines
    pub tag: Option<String>,
}

impl PollRequest {
    /// Build a request with polling defaults; fails on a state the topic never reaches
    pub fn new(
        access_token: impl Into<String>,
        wallet_id: impl Into<String>,
        topic: Topic,
        field: impl Into<String>,
        field_id: impl Into<String>,
        state: impl Into<String>,
    ) -> Result<Self, EventError> {
        let state = state.into();
        if !topic.accepts(&state) {
            return Err(EventError::InvalidState { topic, state });
        }

        let defaults = PollingConfig::default();
        Ok(Self {
            access_token: access_token.into(),
            wallet_id: wallet_id.into(),
            topic,
            field: field.into(),
            field_id: field_id.into(),
            state,
            look_back: defaults.look_back,
            max_attempts: defaults.max_attempts,
            request_timeout: defaults.request_timeout,
            tag: None,
        })
    }

    /// Take attempt count, look-back and timeout from configuration
    pub fn with_polling(mut self, polling: &PollingConfig) -> Self {
        self.look_back = polling.look_back;
        self.max_attempts = polling.max_attempts;
        self.request_timeout = polling.request_timeout;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn validate(&self) -> Result<(), EventError> {
        if self.max_attempts == 0 {
            return Err(EventError::NoAttempts);
        }
        if !self.topic.accepts(&self.state) {
            return Err(EventError::InvalidState {
                topic: self.topic,
                state: self.state.clone(),
            });
        }
        Ok(())
    }

    /// Status endpoint path relative to the API base
    pub fn path(&self) -> String {
        format!(
            "tenant/v1/sse/{}/{}/{}/{}/{}?look_back={}",
            self.wallet_id, self.topic, self.field, self.field_id, self.state, self.look_back
        )
    }

    /// Label used in log lines
    pub fn label(&self) -> String {
        match &self.tag {
            Some(tag) => format!(
                "{} {}={} -> {} ({})",
                self.topic, self.field, self.field_id, self.state, tag
            ),
            None => format!("{} {}={} -> {}", self.topic, self.field, self.field_id, self.state),
        }
    }
}
