//! Bounded retry with exponential backoff for transient delegate failures.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How often and how patiently a stage retries its delegate.
///
/// The default is a single attempt with no retry. In TOML:
///
/// ```toml
/// [retry]
/// max_attempts = 3
/// initial_backoff_ms = 500
/// max_backoff_ms = 8000
/// multiplier = 2
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryPolicy {
    /// Total delegate calls per stage, including the first. `0` acts as `1`.
    pub max_attempts: u32,
    /// Wait after the first failed attempt.
    pub initial_backoff_ms: u64,
    /// Upper bound on any single wait.
    pub max_backoff_ms: u64,
    /// Growth factor applied after each further failure.
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff_ms: 500,
            max_backoff_ms: 8_000,
            multiplier: 2,
        }
    }
}

impl RetryPolicy {
    /// A policy allowing `max_attempts` calls with the default backoff.
    pub fn attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Whether another call is allowed after `attempt` calls have failed.
    pub fn allows_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts.max(1)
    }

    /// How long to wait after the `failed_attempt`-th failure (1-based).
    pub fn backoff_after(&self, failed_attempt: u32) -> Duration {
        let factor = u64::from(self.multiplier).saturating_pow(failed_attempt.saturating_sub(1));
        let millis = self
            .initial_backoff_ms
            .saturating_mul(factor)
            .min(self.max_backoff_ms);
        Duration::from_millis(millis)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::RetryPolicy;

    #[test]
    fn default_is_single_attempt() {
        let policy = RetryPolicy::default();
        assert!(!policy.allows_retry(1));
    }

    #[test]
    fn zero_attempts_behaves_like_one() {
        let policy = RetryPolicy::attempts(0);
        assert!(!policy.allows_retry(1));
    }

    #[test]
    fn allows_retry_up_to_max_attempts() {
        let policy = RetryPolicy::attempts(3);
        assert!(policy.allows_retry(1));
        assert!(policy.allows_retry(2));
        assert!(!policy.allows_retry(3));
    }

    #[test]
    fn backoff_grows_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 10,
            initial_backoff_ms: 100,
            max_backoff_ms: 1_000,
            multiplier: 3,
        };
        assert_eq!(policy.backoff_after(1), Duration::from_millis(100));
        assert_eq!(policy.backoff_after(2), Duration::from_millis(300));
        assert_eq!(policy.backoff_after(3), Duration::from_millis(900));
        assert_eq!(policy.backoff_after(4), Duration::from_millis(1_000));
        assert_eq!(policy.backoff_after(60), Duration::from_millis(1_000));
    }
}
