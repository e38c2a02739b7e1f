//! Serde helpers shared by the configuration domains

use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

/// Durations written as whole seconds; read from seconds or a humantime string
/// such as `"500ms"` or `"2m"`
pub mod serde_duration {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDuration {
        Seconds(u64),
        Human(#[serde(with = "humantime_serde")] Duration),
    }

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawDuration::deserialize(deserializer)? {
            RawDuration::Seconds(seconds) => Duration::from_secs(seconds),
            RawDuration::Human(duration) => duration,
        })
    }
}

pub fn default_true() -> bool {
    true
}
