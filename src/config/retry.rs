//! Retry policy for the Metigan client.

use rand::Rng;
use std::time::Duration;

use crate::error::MetiganError;

/// Configuration for retry behavior.
///
/// The delay for attempt `n` (0-indexed) is `base_delay * 2^n`, capped at
/// `max_backoff`. When `jitter` is set the delay is scaled by a random
/// factor in `0.5..=1.5` (±50 %), which the email sending path enables to
/// spread out concurrent resends.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one.
    pub max_attempts: u32,

    /// Base delay before the first retry.
    pub base_delay: Duration,

    /// Ceiling on any single backoff wait.
    pub max_backoff: Duration,

    /// Whether to jitter delays by ±50 %.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            max_backoff: Duration::from_secs(30),
            jitter: false,
        }
    }
}

impl RetryConfig {
    /// Calculate the backoff delay for a given attempt (0-indexed).
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use metigan::config::RetryConfig;
    ///
    /// let config = RetryConfig {
    ///     base_delay: Duration::from_millis(100),
    ///     jitter: false,
    ///     ..RetryConfig::default()
    /// };
    /// assert_eq!(config.calculate_delay(0), Duration::from_millis(100));
    /// assert_eq!(config.calculate_delay(2), Duration::from_millis(400));
    /// ```
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        let exp = attempt.min(20); // avoid shift overflow on absurd attempt counts
        let backoff = self
            .base_delay
            .saturating_mul(1u32 << exp)
            .min(self.max_backoff);

        if self.jitter {
            let factor = rand::thread_rng().gen_range(0.5..=1.5);
            Duration::from_millis((backoff.as_millis() as f64 * factor) as u64)
        } else {
            backoff
        }
    }

    /// Whether the given error should be retried at this attempt.
    pub fn should_retry(&self, attempt: u32, error: &MetiganError) -> bool {
        if attempt + 1 >= self.max_attempts {
            return false;
        }
        error.is_retryable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.base_delay, Duration::from_millis(1000));
        assert!(!config.jitter);
    }

    #[test]
    fn test_exponential_delay_without_jitter() {
        let config = RetryConfig {
            max_attempts: 5,
            base_delay: Duration::from_millis(100),
            max_backoff: Duration::from_secs(30),
            jitter: false,
        };

        assert_eq!(config.calculate_delay(0), Duration::from_millis(100));
        assert_eq!(config.calculate_delay(1), Duration::from_millis(200));
        assert_eq!(config.calculate_delay(2), Duration::from_millis(400));
        assert_eq!(config.calculate_delay(3), Duration::from_millis(800));
    }

    #[test]
    fn test_delay_capped_at_max_backoff() {
        let config = RetryConfig {
            max_attempts: 10,
            base_delay: Duration::from_millis(100),
            max_backoff: Duration::from_millis(500),
            jitter: false,
        };

        // 100 * 2^5 = 3200ms, capped at 500ms.
        assert_eq!(config.calculate_delay(5), Duration::from_millis(500));
    }

    #[test]
    fn test_jittered_delay_within_band() {
        let config = RetryConfig {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
            max_backoff: Duration::from_secs(30),
            jitter: true,
        };

        for _ in 0..50 {
            let delay = config.calculate_delay(0);
            assert!(delay >= Duration::from_millis(50));
            assert!(delay <= Duration::from_millis(150));
        }
    }

    #[test]
    fn test_should_retry_respects_budget() {
        let config = RetryConfig::default();
        let error = MetiganError::Api {
            status: 503,
            message: "unavailable".to_string(),
            data: None,
        };

        assert!(config.should_retry(0, &error));
        assert!(config.should_retry(1, &error));
        assert!(!config.should_retry(2, &error)); // third attempt is the last
    }

    #[test]
    fn test_should_retry_client_error() {
        let config = RetryConfig::default();
        let error = MetiganError::Api {
            status: 404,
            message: "not found".to_string(),
            data: None,
        };

        assert!(!config.should_retry(0, &error));
    }
}
