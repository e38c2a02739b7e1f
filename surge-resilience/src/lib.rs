//! Resilience patterns for surge
//!
//! A bounded retry wrapper for any fallible async operation and the
//! backoff schedules used between event-poll attempts.

pub mod backoff;
pub mod retry;

pub use backoff::BackoffCalculator;
pub use retry::retry;
