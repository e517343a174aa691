use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_MULTIPLIER: f64 = 2.0;
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(10);

/// Bounded retry with exponential backoff.
///
/// `max_attempts` counts the initial call, so the default of 3 means one call
/// plus two retries, waiting 1s and then 2s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    multiplier: f64,
    max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(
        max_attempts: u32,
        initial_delay: Duration,
        multiplier: f64,
        max_delay: Duration,
    ) -> Result<Self, DomainError> {
        if max_attempts < 1 {
            return Err(DomainError::config("max_attempts must be at least 1"));
        }
        if !multiplier.is_finite() || multiplier <= 1.0 {
            return Err(DomainError::config(format!(
                "multiplier must be greater than 1.0, got {multiplier}"
            )));
        }
        if max_delay < initial_delay {
            return Err(DomainError::config(format!(
                "max_delay ({}ms) must not be below initial_delay ({}ms)",
                max_delay.as_millis(),
                initial_delay.as_millis()
            )));
        }

        Ok(Self {
            max_attempts,
            initial_delay,
            multiplier,
            max_delay,
        })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// The waits between consecutive attempts, in order. Yields
    /// `max_attempts - 1` values.
    pub fn backoff(&self) -> Backoff {
        Backoff {
            next: self.initial_delay.min(self.max_delay),
            multiplier: self.multiplier,
            max_delay: self.max_delay,
            remaining: self.max_attempts.saturating_sub(1),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: DEFAULT_INITIAL_DELAY,
            multiplier: DEFAULT_MULTIPLIER,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

/// Running backoff delay. Each step multiplies the previous delay, so the
/// growth compounds, and every value is clamped to the policy maximum.
#[derive(Debug, Clone)]
pub struct Backoff {
    next: Duration,
    multiplier: f64,
    max_delay: Duration,
    remaining: u32,
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let current = self.next;
        // Saturate at max_delay instead of overflowing Duration.
        self.next = Duration::try_from_secs_f64(self.next.as_secs_f64() * self.multiplier)
            .map_or(self.max_delay, |grown| grown.min(self.max_delay));
        Some(current)
    }
}
