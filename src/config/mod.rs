//! Configuration for the Metigan client.
//!
//! This module provides the configuration type and builder controlling
//! client behavior:
//!
//! - API key and optional user id
//! - Base URL (override via the `METIGAN_BASE_URL` environment variable)
//! - Timeouts and retry policy
//! - Client-side rate limiting
//! - Sanitization, debug-logging and telemetry toggles

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;

pub mod error;
pub mod rate_limit;
pub mod retry;

pub use error::ConfigError;
pub use rate_limit::{RateLimitConfig, RateLimiter};
pub use retry::RetryConfig;

use crate::types::attachment::AttachmentEncoding;

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.metigan.com";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "METIGAN_BASE_URL";

/// Configuration for the Metigan client.
///
/// Immutable after construction; each client owns its own copy, so two
/// clients built from the same API key never share limiter or telemetry
/// state.
#[derive(Clone)]
pub struct MetiganConfig {
    /// API key sent as the `x-api-key` header. Required, non-empty.
    pub api_key: SecretString,

    /// Optional account user id, attached to telemetry records.
    pub user_id: Option<String>,

    /// Base URL of the Metigan API.
    pub base_url: String,

    /// Timeout for the entire request.
    pub timeout: Duration,

    /// Timeout for establishing connections.
    pub connect_timeout: Duration,

    /// Retry policy for retryable failures.
    pub retry_config: RetryConfig,

    /// Client-side rate limiting; `None` disables the gate.
    pub rate_limit: Option<RateLimitConfig>,

    /// Whether outbound HTML content is run through the sanitizer.
    pub sanitize_html: bool,

    /// Disables the best-effort usage telemetry entirely.
    pub disable_logs: bool,

    /// Enables verbose diagnostic logging.
    pub debug: bool,

    /// How attachments are encoded onto the wire.
    pub attachment_encoding: AttachmentEncoding,

    /// Flush interval for the batched usage logger.
    pub usage_flush_interval: Duration,
}

impl MetiganConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use metigan::config::MetiganConfig;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = MetiganConfig::builder()
    ///     .api_key("mg_live_xxx")
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder() -> MetiganConfigBuilder {
        MetiganConfigBuilder::default()
    }

    /// The API key as a plain string slice.
    pub(crate) fn api_key_str(&self) -> &str {
        self.api_key.expose_secret()
    }
}

impl std::fmt::Debug for MetiganConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetiganConfig")
            .field("api_key", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry_config", &self.retry_config)
            .field("rate_limit", &self.rate_limit)
            .field("sanitize_html", &self.sanitize_html)
            .field("disable_logs", &self.disable_logs)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

/// Builder for [`MetiganConfig`].
#[derive(Default)]
pub struct MetiganConfigBuilder {
    api_key: Option<SecretString>,
    user_id: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    retry_count: Option<u32>,
    retry_delay: Option<Duration>,
    retry_config: Option<RetryConfig>,
    rate_limit: Option<RateLimitConfig>,
    disable_rate_limit: bool,
    sanitize_html: Option<bool>,
    disable_logs: bool,
    debug: bool,
    attachment_encoding: Option<AttachmentEncoding>,
    usage_flush_interval: Option<Duration>,
}

impl MetiganConfigBuilder {
    /// Set the API key. Required and non-empty.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(key.into()));
        self
    }

    /// Set the account user id attached to telemetry.
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Override the base URL (takes precedence over `METIGAN_BASE_URL`).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout (default 30 s).
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the connection timeout (default 10 s).
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = Some(duration);
        self
    }

    /// Set the number of attempts for retryable failures (default 3).
    pub fn retry_count(mut self, count: u32) -> Self {
        self.retry_count = Some(count);
        self
    }

    /// Set the base backoff delay (default 1 s).
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    /// Replace the whole retry policy. Overrides `retry_count`/`retry_delay`.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = Some(config);
        self
    }

    /// Set the maximum requests per second for the client-side gate
    /// (default 10 per 1 s window).
    pub fn max_requests_per_second(mut self, max: u32) -> Self {
        self.rate_limit = Some(RateLimitConfig {
            max_requests: max,
            window: Duration::from_millis(1000),
        });
        self
    }

    /// Replace the whole rate-limit configuration.
    pub fn rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit = Some(config);
        self
    }

    /// Disable the client-side rate limiter.
    pub fn disable_rate_limit(mut self) -> Self {
        self.disable_rate_limit = true;
        self
    }

    /// Toggle outbound HTML sanitization (default true).
    pub fn sanitize_html(mut self, enabled: bool) -> Self {
        self.sanitize_html = Some(enabled);
        self
    }

    /// Turn off the best-effort usage telemetry.
    pub fn disable_logs(mut self) -> Self {
        self.disable_logs = true;
        self
    }

    /// Enable verbose diagnostic logging.
    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Choose how attachments are encoded (default JSON with embedded
    /// base64; use [`AttachmentEncoding::Multipart`] in contexts that
    /// build form uploads).
    pub fn attachment_encoding(mut self, encoding: AttachmentEncoding) -> Self {
        self.attachment_encoding = Some(encoding);
        self
    }

    /// Flush interval for the batched usage logger (default 1 s).
    /// Exposed so tests can tighten the cadence.
    pub fn usage_flush_interval(mut self, interval: Duration) -> Self {
        self.usage_flush_interval = Some(interval);
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when the API key is unset or
    /// empty, and [`ConfigError::Invalid`] when the base URL cannot be
    /// parsed.
    pub fn build(self) -> Result<MetiganConfig, ConfigError> {
        let api_key = self.api_key.ok_or_else(|| ConfigError::MissingField {
            field: "api_key".to_string(),
        })?;
        if api_key.expose_secret().trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "api_key".to_string(),
            });
        }

        let base_url = self
            .base_url
            .or_else(|| std::env::var(BASE_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = base_url.trim_end_matches('/').to_string();

        Url::parse(&base_url).map_err(|e| ConfigError::Invalid {
            message: format!("base URL is not a valid URL: {}", e),
        })?;

        let mut retry_config = self.retry_config.unwrap_or_default();
        if let Some(count) = self.retry_count {
            retry_config.max_attempts = count;
        }
        if let Some(delay) = self.retry_delay {
            retry_config.base_delay = delay;
        }

        let rate_limit = if self.disable_rate_limit {
            None
        } else {
            Some(self.rate_limit.unwrap_or_default())
        };

        Ok(MetiganConfig {
            api_key,
            user_id: self.user_id,
            base_url,
            timeout: self.timeout.unwrap_or(Duration::from_secs(30)),
            connect_timeout: self.connect_timeout.unwrap_or(Duration::from_secs(10)),
            retry_config,
            rate_limit,
            sanitize_html: self.sanitize_html.unwrap_or(true),
            disable_logs: self.disable_logs,
            debug: self.debug,
            attachment_encoding: self.attachment_encoding.unwrap_or_default(),
            usage_flush_interval: self.usage_flush_interval.unwrap_or(Duration::from_secs(1)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MetiganConfig::builder().api_key("mg_test").build().unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.retry_config.max_attempts, 3);
        assert_eq!(config.retry_config.base_delay, Duration::from_millis(1000));
        assert!(config.sanitize_html);
        assert!(!config.disable_logs);
        assert!(!config.debug);

        let rate_limit = config.rate_limit.expect("rate limit enabled by default");
        assert_eq!(rate_limit.max_requests, 10);
        assert_eq!(rate_limit.window, Duration::from_millis(1000));
    }

    #[test]
    fn test_missing_api_key() {
        let err = MetiganConfig::builder().build().unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { ref field } if field == "api_key"));
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let err = MetiganConfig::builder().api_key("").build().unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { ref field } if field == "api_key"));

        let err = MetiganConfig::builder().api_key("   ").build().unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { .. }));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = MetiganConfig::builder()
            .api_key("mg_test")
            .base_url("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = MetiganConfig::builder()
            .api_key("mg_test")
            .base_url("https://staging.metigan.dev/")
            .build()
            .unwrap();
        assert_eq!(config.base_url, "https://staging.metigan.dev");
    }

    #[test]
    fn test_retry_knobs() {
        let config = MetiganConfig::builder()
            .api_key("mg_test")
            .retry_count(5)
            .retry_delay(Duration::from_millis(200))
            .build()
            .unwrap();

        assert_eq!(config.retry_config.max_attempts, 5);
        assert_eq!(config.retry_config.base_delay, Duration::from_millis(200));
    }

    #[test]
    fn test_disable_rate_limit() {
        let config = MetiganConfig::builder()
            .api_key("mg_test")
            .disable_rate_limit()
            .build()
            .unwrap();
        assert!(config.rate_limit.is_none());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = MetiganConfig::builder()
            .api_key("mg_super_secret")
            .build()
            .unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("mg_super_secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
