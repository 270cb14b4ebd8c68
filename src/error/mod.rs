//! Error types for the Metigan client.
//!
//! Every failure surfaced by this crate is one of three caller-facing kinds:
//!
//! - **Validation errors** are raised before any network round trip, for
//!   malformed or missing input. Fix the input and call again.
//! - **API errors** carry the status and message the Metigan API returned,
//!   either for a definitive 4xx failure or after the retry budget for a
//!   retryable class was exhausted. A status of `0` means no HTTP status was
//!   ever observed (pure network failure).
//! - **Wrapped errors** (`Transport`, `Timeout`, `Serialization`,
//!   `Configuration`, `Unknown`) cover everything unexpected. Their messages
//!   deliberately do not leak internal stack detail.
//!
//! # Examples
//!
//! ```rust
//! use metigan::error::MetiganError;
//!
//! fn handle(error: &MetiganError) {
//!     if error.is_retryable() {
//!         if let Some(wait) = error.retry_after() {
//!             println!("retry after {:?}", wait);
//!         }
//!     } else if let Some(status) = error.status() {
//!         println!("API rejected the request with status {}", status);
//!     }
//! }
//! ```

mod result;

pub use result::{retry_with_backoff, retry_with_jitter, MetiganResult};

use std::time::Duration;
use thiserror::Error;

/// Top-level error type for all Metigan operations.
#[derive(Debug, Error)]
pub enum MetiganError {
    /// Client misconfiguration (missing API key, malformed base URL, ...).
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },

    /// Input rejected by a pre-flight check, before any network call.
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the validation failure.
        message: String,
        /// The field that failed validation, when known.
        field: Option<String>,
    },

    /// Definitive failure reported by the Metigan API, or the terminal error
    /// after the retry budget was spent on a retryable class.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code; `0` when no status was ever observed.
        status: u16,
        /// The remote-supplied message, or a generic fallback.
        message: String,
        /// Raw error payload from the API, when one was returned.
        data: Option<serde_json::Value>,
    },

    /// The client-side rate limiter denied the request.
    #[error("Rate limit exceeded, retry in {retry_after:?}")]
    RateLimited {
        /// How long to wait until the sliding window admits another request.
        retry_after: Duration,
    },

    /// Network-level failure (connection refused, DNS, TLS, ...).
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
        /// Underlying error, when available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        /// Whether this failure class is worth retrying.
        retryable: bool,
    },

    /// The request exceeded the configured timeout.
    #[error("Timeout: {message}")]
    Timeout {
        /// Description of the timeout.
        message: String,
    },

    /// Request serialization or response deserialization failed.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization failure.
        message: String,
    },

    /// Catch-all for unexpected conditions.
    #[error("Unexpected error: {message}")]
    Unknown {
        /// Sanitized description of the failure.
        message: String,
    },
}

impl MetiganError {
    /// Returns true if the operation may succeed when attempted again.
    ///
    /// Retryable classes are transport failures flagged as such, timeouts,
    /// client-side rate-limit rejections, and API responses with a 5xx
    /// status or 429 (server-side throttling).
    pub fn is_retryable(&self) -> bool {
        match self {
            MetiganError::Transport { retryable, .. } => *retryable,
            MetiganError::Timeout { .. } => true,
            MetiganError::RateLimited { .. } => true,
            MetiganError::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Returns the HTTP status for API errors, `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            MetiganError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the suggested wait before retrying, when the error carries one.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            MetiganError::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }

    /// Shorthand for a validation error without a field name.
    pub fn validation(message: impl Into<String>) -> Self {
        MetiganError::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Shorthand for a validation error naming the offending field.
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        MetiganError::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl From<serde_json::Error> for MetiganError {
    fn from(err: serde_json::Error) -> Self {
        MetiganError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for MetiganError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MetiganError::Timeout {
                message: err.to_string(),
            }
        } else {
            let retryable = err.is_connect()
                || err.is_request()
                || err.status().map_or(true, |s| s.is_server_error());
            MetiganError::Transport {
                message: err.to_string(),
                source: Some(Box::new(err)),
                retryable,
            }
        }
    }
}

impl From<url::ParseError> for MetiganError {
    fn from(err: url::ParseError) -> Self {
        MetiganError::Configuration {
            message: format!("Invalid URL: {}", err),
        }
    }
}
