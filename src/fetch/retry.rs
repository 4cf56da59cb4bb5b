//! Retry policy with exponential backoff
//!
//! Delay before attempt `n + 1` is `initial * 2^(n-1)`, capped at `max`.
//! With the defaults (3 attempts, 4s, 10s) that is 4s then 8s.

use async_trait::async_trait;
use std::time::Duration;

/// Retry configuration for the resilient fetcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay after the first failed attempt
    pub initial_backoff: Duration,
    /// Upper bound for any single delay
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(4),
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Returns the delay to wait after failed attempt number `attempt` (1-based)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    /// Returns true if another attempt is allowed after `attempt` attempts
    pub fn allows_retry_after(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

/// Suspends execution between attempts
#[async_trait]
pub trait Pause: Send + Sync {
    async fn pause(&self, duration: Duration);
}

/// [`Pause`] implementation backed by `tokio::time::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPause;

#[async_trait]
impl Pause for TokioPause {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
