use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::llm::ProviderError;

/// Retry settings for provider calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_delay_ms: u64,
    /// Cap on any single delay, including server-requested ones
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 500,
            max_delay_ms: 30_000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    pub fn with_initial_delay(mut self, ms: u64) -> Self {
        self.initial_delay_ms = ms;
        self
    }

    pub fn with_max_delay(mut self, ms: u64) -> Self {
        self.max_delay_ms = ms;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before retry number `retry` (0-indexed)
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let delay = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(exponent);
        let delay_ms = delay.max(0.0).min(self.max_delay_ms as f64) as u64;

        Duration::from_millis(delay_ms)
    }

    /// Delay after `error`, preferring the provider's Retry-After hint
    pub fn delay_after(&self, error: &ProviderError, retry: u32) -> Duration {
        let cap = Duration::from_millis(self.max_delay_ms);
        match error.retry_after() {
            Some(hint) => hint.min(cap),
            None => self.delay_for_retry(retry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_backoff() {
        let policy = RetryPolicy::new(5)
            .with_initial_delay(100)
            .with_backoff_multiplier(2.0)
            .with_max_delay(1000);

        assert_eq!(policy.delay_for_retry(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for_retry(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for_retry(2), Duration::from_millis(400));
        assert_eq!(policy.delay_for_retry(3), Duration::from_millis(800));
        assert_eq!(policy.delay_for_retry(4), Duration::from_millis(1000));
        assert_eq!(policy.max_attempts(), 6);
    }

    #[test]
    fn test_retry_after_is_honoured_and_capped() {
        let policy = RetryPolicy::new(2).with_initial_delay(100).with_max_delay(5000);

        let hinted = ProviderError::rate_limited("openai", Some(Duration::from_secs(2)), "slow");
        assert_eq!(policy.delay_after(&hinted, 0), Duration::from_secs(2));

        let greedy = ProviderError::rate_limited("openai", Some(Duration::from_secs(600)), "slow");
        assert_eq!(policy.delay_after(&greedy, 0), Duration::from_millis(5000));

        let plain = ProviderError::server("openai", 500, "boom");
        assert_eq!(policy.delay_after(&plain, 1), Duration::from_millis(200));
    }

    #[test]
    fn test_huge_retry_index_stays_capped() {
        let policy = RetryPolicy::new(3).with_initial_delay(100).with_max_delay(2_000);
        assert_eq!(policy.delay_for_retry(u32::MAX), Duration::from_millis(2_000));
        assert_eq!(policy.delay_for_retry(i32::MAX as u32 + 1), Duration::from_millis(2_000));
    }

    #[test]
    fn test_max_attempts_saturates() {
        assert_eq!(RetryPolicy::new(u32::MAX).max_attempts(), u32::MAX);
        assert_eq!(RetryPolicy::new(0).max_attempts(), 1);
    }
}
