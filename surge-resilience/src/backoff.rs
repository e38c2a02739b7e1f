//! Backoff schedules for event polling

use std::time::Duration;

/// Delays used between event-poll attempts
pub const DEFAULT_POLL_DELAYS_MS: [u64; 4] = [500, 1000, 2000, 3000];

/// Delay calculator over an explicit schedule; the last entry repeats
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffCalculator {
    delays: Vec<Duration>,
}

impl BackoffCalculator {
    /// Calculator over a millisecond schedule
    pub fn schedule(delays_ms: Vec<u64>) -> Self {
        Self {
            delays: delays_ms.into_iter().map(Duration::from_millis).collect(),
        }
    }

    /// Calculate delay for a specific attempt (1-indexed)
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let index = (attempt as usize).saturating_sub(1);
        self.delays
            .get(index)
            .or_else(|| self.delays.last())
            .copied()
            .unwrap_or(Duration::ZERO)
    }
}

impl Default for BackoffCalculator {
    fn default() -> Self {
        Self::schedule(DEFAULT_POLL_DELAYS_MS.to_vec())
    }
}
