//! Bounded resubmission of operations

use std::{future::Future, time::Duration};

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::{
    constants::{
        CONFIRMATION_DELAY, INITIAL_RETRY_DELAY, MAX_RETRY_DELAY, MAX_SUBMISSION_ATTEMPTS,
        RETRY_BACKOFF_FACTOR,
    },
    errors::ClientError,
};

/// How failed operations are resubmitted, and how long to wait after a
/// successful one
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// The maximum number of submissions, including the first one
    pub max_attempts: u32,
    /// The delay before the first resubmission
    pub initial_delay: Duration,
    /// The upper bound on the delay between resubmissions
    pub max_delay: Duration,
    /// The delay after a successful submission, giving the node's mempool
    /// time to catch up
    pub confirmation_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: MAX_SUBMISSION_ATTEMPTS,
            initial_delay: INITIAL_RETRY_DELAY,
            max_delay: MAX_RETRY_DELAY,
            confirmation_delay: CONFIRMATION_DELAY,
        }
    }
}

impl RetryPolicy {
    /// A policy that never sleeps
    #[cfg(test)]
    pub fn immediate(max_attempts: u32) -> Self {
        RetryPolicy {
            max_attempts,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            confirmation_delay: Duration::ZERO,
        }
    }

    /// The delay before the resubmission following `attempt`
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = RETRY_BACKOFF_FACTOR.saturating_pow(attempt.saturating_sub(1));
        self.initial_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }
}

/// Runs `attempt` until it succeeds, it fails in a way repeating it cannot
/// fix, or the policy's attempts are exhausted.
///
/// The final error is returned without being logged, its caller reports it.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    description: &str,
    mut attempt: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut attempt_number = 1;
    loop {
        match attempt().await {
            Ok(res) => return Ok(res),
            Err(e) if e.is_retryable() && attempt_number < policy.max_attempts => {
                let delay = policy.delay_after(attempt_number);
                warn!(
                    "[{attempt_number}/{}] {description} failed, retrying in {}s: {e}",
                    policy.max_attempts,
                    delay.as_secs()
                );
                sleep(delay).await;
                attempt_number += 1;
            }
            Err(e) => {
                debug!(
                    "[{attempt_number}/{}] {description} failed, giving up",
                    policy.max_attempts
                );
                return Err(e);
            }
        }
    }
}

/// Submits an operation with [`retry_with_backoff`], then waits for the
/// policy's confirmation delay.
///
/// `submit` must issue the exact same operation on every call, counter
/// included.
pub async fn submit_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    description: &str,
    submit: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let res = retry_with_backoff(policy, description, submit).await?;
    sleep(policy.confirmation_delay).await;
    Ok(res)
}
