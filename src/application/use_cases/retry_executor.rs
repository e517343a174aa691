use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::{DomainError, RetryPolicy};

/// Classifies which failures are worth another attempt.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

impl Retryable for DomainError {
    fn is_retryable(&self) -> bool {
        self.is_transient()
    }
}

/// Runs a fallible async operation under a [`RetryPolicy`].
///
/// Successes return immediately. Non-retryable errors propagate without
/// consuming further attempts. Retryable errors are retried after the next
/// backoff delay until `max_attempts` calls have been made, after which the
/// last error is returned.
///
/// The sleep between attempts suspends only the calling task.
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn execute<T, E, F, Fut>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + Display,
    {
        let mut backoff = self.policy.backoff();
        let mut attempt: u32 = 1;

        loop {
            let err = match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(attempt, "Operation succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };

            if !err.is_retryable() {
                debug!(attempt, error = %err, "Non-retryable failure");
                return Err(err);
            }

            let Some(delay) = backoff.next() else {
                warn!(
                    attempts = attempt,
                    error = %err,
                    "Retries exhausted"
                );
                return Err(err);
            };

            warn!(
                attempt,
                max_attempts = self.policy.max_attempts(),
                delay_ms = delay_millis(delay),
                error = %err,
                "Transient failure, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

fn delay_millis(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}
