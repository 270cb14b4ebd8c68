//! Client-side sliding-window rate limiter.
//!
//! This is a best-effort gate that keeps the calling application below a
//! configured request rate before traffic ever leaves the process. It is
//! not a substitute for the server-side throttling the Metigan API applies.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Configuration for the sliding-window rate limiter.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum granted requests within any trailing window.
    pub max_requests: u32,

    /// Width of the sliding window.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_millis(1000),
        }
    }
}

/// Sliding-window rate limiter over granted-request timestamps.
///
/// Timestamps older than the window are pruned lazily on each check.
/// Invariant: the number of granted requests in any trailing `window`
/// interval never exceeds `max_requests`.
///
/// # Examples
///
/// ```
/// use metigan::config::{RateLimitConfig, RateLimiter};
///
/// let limiter = RateLimiter::new(RateLimitConfig::default());
/// if limiter.try_request() {
///     // make the API call
/// } else {
///     let wait = limiter.time_until_next_request();
///     // back off for `wait`
/// }
/// ```
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    timestamps: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            timestamps: Mutex::new(VecDeque::with_capacity(config.max_requests as usize)),
            config,
        }
    }

    /// Whether a request would currently be granted.
    pub fn can_make_request(&self) -> bool {
        let mut timestamps = self.timestamps.lock().unwrap();
        Self::prune(&mut timestamps, self.config.window);
        (timestamps.len() as u32) < self.config.max_requests
    }

    /// Record a granted request at the current instant.
    pub fn record_request(&self) {
        let mut timestamps = self.timestamps.lock().unwrap();
        timestamps.push_back(Instant::now());
    }

    /// Atomically check and record: returns whether the request was granted.
    ///
    /// Check and append happen under a single lock acquisition, so two
    /// concurrent callers can never both be granted the last slot.
    pub fn try_request(&self) -> bool {
        let mut timestamps = self.timestamps.lock().unwrap();
        Self::prune(&mut timestamps, self.config.window);
        if (timestamps.len() as u32) < self.config.max_requests {
            timestamps.push_back(Instant::now());
            true
        } else {
            false
        }
    }

    /// How long until the next request would be granted.
    ///
    /// Returns zero when a request is currently allowed; otherwise
    /// `window - (now - oldest)`, floored at zero.
    pub fn time_until_next_request(&self) -> Duration {
        let mut timestamps = self.timestamps.lock().unwrap();
        Self::prune(&mut timestamps, self.config.window);
        if (timestamps.len() as u32) < self.config.max_requests {
            return Duration::ZERO;
        }
        match timestamps.front() {
            Some(oldest) => self.config.window.saturating_sub(oldest.elapsed()),
            None => Duration::ZERO,
        }
    }

    /// Clear all recorded timestamps.
    pub fn reset(&self) {
        self.timestamps.lock().unwrap().clear();
    }

    fn prune(timestamps: &mut VecDeque<Instant>, window: Duration) {
        let now = Instant::now();
        while let Some(oldest) = timestamps.front() {
            if now.duration_since(*oldest) >= window {
                timestamps.pop_front();
            } else {
                break;
            }
        }
    }
}
