//! Retry policy for failed persistence jobs
//!
//! Exponential backoff with a hard attempt cap. With the defaults (1s base,
//! 5 attempts) a job that keeps failing is retried after 1s, 2s, 4s, and 8s,
//! then buried after its fifth failure.

use relay_common::QueueConfig;
use std::time::Duration;

/// Backoff schedule and attempt budget for the persistence queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay after the first failed attempt; doubles per subsequent failure
    pub base_delay: Duration,
    /// Total attempts before a job is buried (including the first)
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(1),
            max_attempts: 5,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with explicit base delay and attempt cap
    #[must_use]
    pub fn new(base_delay: Duration, max_attempts: u32) -> Self {
        Self {
            base_delay,
            max_attempts,
        }
    }

    /// Build the policy from queue configuration
    #[must_use]
    pub fn from_config(config: &QueueConfig) -> Self {
        Self {
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_attempts: config.max_attempts.max(1),
        }
    }

    /// Delay before the retry that follows failed attempt `attempt` (1-based).
    ///
    /// Returns `None` when the budget is exhausted and the job must be buried
    /// instead of rescheduled.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }
        let exponent = attempt.saturating_sub(1).min(31);
        Some(self.base_delay * 2u32.saturating_pow(exponent))
    }
}
