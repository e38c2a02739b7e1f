//! Bounded retry for fallible async operations

use log::{error, info, warn};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Retry an operation up to `retries` times with a fixed delay.
///
/// A first-attempt success is returned silently. A later success is logged
/// at info level with the attempt that succeeded. Every failure before the
/// last is logged as a warning and followed by `delay`; exhausting all
/// attempts logs an error and returns the last failure unchanged.
///
/// `retries` of 0 or 1 runs the operation exactly once, with no delay and
/// no retry logging.
pub async fn retry<F, Fut, T, E>(
    mut operation: F,
    retries: u32,
    delay: Duration,
    label: &str,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let attempts = retries.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    info!("{} succeeded on attempt {}/{}", label, attempt, attempts);
                }
                return Ok(result);
            }
            Err(err) => {
                if attempt >= attempts {
                    if attempts > 1 {
                        error!("{} failed after {} attempts: {}", label, attempts, err);
                    }
                    return Err(err);
                }

                warn!(
                    "{} attempt {}/{} failed: {}. Retrying in {:?}",
                    label, attempt, attempts, err, delay
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
