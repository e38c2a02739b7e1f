//! Event body decoding
//!
//! The status endpoint answers either with a single streaming frame
//! (`data: {...}`) or with bare JSON, depending on deployment.

use serde_json::Value;

const DATA_MARKER: &str = "data:";

/// A decoded event-status body
#[derive(Debug, Clone, PartialEq)]
pub enum EventBody {
    /// `data:`-prefixed frame, marker stripped
    Stream(Value),
    /// Bare JSON object or array
    Json(Value),
    /// Anything else, kept for logging
    Unparseable(String),
}

/// Classify and decode a response body
pub fn parse_body(body: &str) -> EventBody {
    let trimmed = body.trim();

    if let Some(rest) = trimmed.strip_prefix(DATA_MARKER) {
        return match serde_json::from_str(rest.trim()) {
            Ok(value) => EventBody::Stream(value),
            Err(_) => EventBody::Unparseable(trimmed.to_string()),
        };
    }

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Ok(value) = serde_json::from_str(trimmed) {
            return EventBody::Json(value);
        }
    }

    EventBody::Unparseable(trimmed.to_string())
}

impl EventBody {
    pub fn value(&self) -> Option<&Value> {
        match self {
            EventBody::Stream(value) | EventBody::Json(value) => Some(value),
            EventBody::Unparseable(_) => None,
        }
    }

    /// Whether the decoded record is the event for `(topic, state)`
    pub fn matches(&self, topic: &str, state: &str) -> bool {
        self.value()
            .is_some_and(|value| event_matches(value, topic, state))
    }
}

/// Exact match on `topic` and `payload.state`; only objects can match
pub fn event_matches(value: &Value, topic: &str, state: &str) -> bool {
    value.get("topic").and_then(Value::as_str) == Some(topic)
        && value.pointer("/payload/state").and_then(Value::as_str) == Some(state)
}

/// One line of a live event stream
#[derive(Debug, Clone, PartialEq)]
pub enum StreamLine {
    /// `data:` with nothing after it; the server's keep-alive
    Ping,
    Data(String),
    /// Comments, `event:`/`id:` fields and frame separators
    Other,
}

pub fn classify_line(line: &str) -> StreamLine {
    match line.trim_end_matches('\r').strip_prefix(DATA_MARKER) {
        Some(data) if data.trim().is_empty() => StreamLine::Ping,
        Some(data) => StreamLine::Data(data.trim().to_string()),
        None => StreamLine::Other,
    }
}
