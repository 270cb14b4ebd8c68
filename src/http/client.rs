//! HTTP client implementation for the Metigan API.
//!
//! This module provides the main HTTP client with authentication headers,
//! retry logic, and rate limiting.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Request;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use crate::config::{MetiganConfig, RateLimiter};
use crate::error::{MetiganError, MetiganResult};

use super::request::{ApiRequest, Body, HttpMethod};
use super::response::ApiResponse;
use super::transport::{ReqwestTransport, Transport};
use super::HttpClient;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// The User-Agent value sent with every request.
pub fn user_agent() -> String {
    format!("metigan-sdk/{} (SDK)", env!("CARGO_PKG_VERSION"))
}

/// HTTP client for Metigan API communication.
///
/// This client handles:
/// - API key authentication via the `x-api-key` header
/// - Automatic retries with exponential backoff
/// - Client-side rate limiting
///
/// # Examples
///
/// ```rust,no_run
/// use metigan::config::MetiganConfig;
/// use metigan::http::MetiganHttpClient;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = MetiganConfig::builder()
///     .api_key("mg_live_xxx")
///     .build()?;
///
/// let client = MetiganHttpClient::new(config)?;
/// # Ok(())
/// # }
/// ```
pub struct MetiganHttpClient {
    /// Client configuration
    config: Arc<MetiganConfig>,

    /// HTTP transport
    transport: Arc<dyn Transport>,

    /// Rate limiter (if configured)
    rate_limiter: Option<Arc<RateLimiter>>,
}

impl MetiganHttpClient {
    /// Create a new Metigan HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying transport cannot be constructed.
    pub fn new(config: MetiganConfig) -> MetiganResult<Self> {
        let transport =
            ReqwestTransport::new(config.timeout, config.connect_timeout)?.into_shared();

        Ok(Self::with_transport(config, transport))
    }

    /// Create a new client with a custom transport.
    ///
    /// This is useful for testing or alternative HTTP implementations.
    pub fn with_transport(config: MetiganConfig, transport: Arc<dyn Transport>) -> Self {
        let rate_limiter = config
            .rate_limit
            .as_ref()
            .map(|cfg| Arc::new(RateLimiter::new(cfg.clone())));

        Self {
            config: Arc::new(config),
            transport,
            rate_limiter,
        }
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &MetiganConfig {
        &self.config
    }

    /// Build a reqwest request from an [`ApiRequest`].
    ///
    /// The body is rebuilt from the request's owned form on every call, so
    /// each retry attempt gets a fresh wire body.
    fn build_request(&self, api_request: &ApiRequest) -> MetiganResult<Request> {
        let url = Url::parse(&api_request.build_url(&self.config.base_url)).map_err(|e| {
            MetiganError::Validation {
                message: format!("Invalid URL: {}", e),
                field: Some("url".to_string()),
            }
        })?;

        let method = match api_request.method() {
            HttpMethod::GET => reqwest::Method::GET,
            HttpMethod::POST => reqwest::Method::POST,
            HttpMethod::PUT => reqwest::Method::PUT,
            HttpMethod::DELETE => reqwest::Method::DELETE,
            HttpMethod::PATCH => reqwest::Method::PATCH,
        };

        let mut builder = self
            .transport
            .client()
            .request(method, url)
            .header(API_KEY_HEADER, self.config.api_key_str())
            .header(http::header::USER_AGENT, user_agent());

        for (name, value) in api_request.headers() {
            builder = builder.header(name, value);
        }

        builder = match api_request.body() {
            Body::Empty => builder,
            Body::Json(bytes) => builder
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(bytes.clone()),
            Body::Multipart(parts) => {
                let mut form = reqwest::multipart::Form::new();
                for part in parts {
                    let mut piece = reqwest::multipart::Part::bytes(part.value.clone());
                    if let Some(filename) = &part.filename {
                        piece = piece.file_name(filename.clone());
                    }
                    if let Some(content_type) = &part.content_type {
                        piece = piece.mime_str(content_type).map_err(|e| {
                            MetiganError::Validation {
                                message: format!("Invalid part content type: {}", e),
                                field: Some("attachments".to_string()),
                            }
                        })?;
                    }
                    form = form.part(part.name.clone(), piece);
                }
                builder.multipart(form)
            }
        };

        builder.build().map_err(Into::into)
    }

    /// Send a request with retry logic.
    ///
    /// Retryable failures (5xx, 429, timeouts, transport errors) are
    /// retried with exponential backoff up to the configured attempt
    /// budget. Other 4xx responses fail on the first attempt. When the
    /// budget is exhausted the last error is wrapped with the attempt
    /// count so callers see how much work was done.
    ///
    /// The rate limiter gates every attempt, not just the first, so a
    /// retry storm can never push the wire request rate past the window.
    /// A denial mid-sequence ends the sequence with [`MetiganError::RateLimited`].
    async fn send_with_retry(&self, api_request: &ApiRequest) -> MetiganResult<ApiResponse> {
        let retry = &self.config.retry_config;
        let mut attempt = 0u32;

        loop {
            if let Some(ref limiter) = self.rate_limiter {
                if !limiter.try_request() {
                    return Err(MetiganError::RateLimited {
                        retry_after: limiter.time_until_next_request(),
                    });
                }
            }

            let request = self.build_request(api_request)?;

            let error = match self.transport.send(request).await {
                Ok(response) => {
                    let api_response = ApiResponse::from_reqwest(response).await?;
                    if api_response.is_success() {
                        return Ok(api_response);
                    }
                    api_response.into_error()
                }
                Err(e) => e,
            };

            if !retry.should_retry(attempt, &error) {
                return Err(self.exhausted(attempt + 1, error));
            }

            let delay = error
                .retry_after()
                .unwrap_or_else(|| retry.calculate_delay(attempt));

            warn!(
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "retrying request"
            );

            sleep(delay).await;
            attempt += 1;
        }
    }

    /// Wrap a terminal error when more than one attempt was made.
    fn exhausted(&self, attempts: u32, error: MetiganError) -> MetiganError {
        if attempts <= 1 || !error.is_retryable() {
            return error;
        }

        let status = error.status().unwrap_or(0);
        MetiganError::Api {
            status,
            message: format!("Request failed after {} attempts: {}", attempts, error),
            data: None,
        }
    }
}

#[async_trait]
impl HttpClient for MetiganHttpClient {
    async fn send_request(&self, request: ApiRequest) -> MetiganResult<ApiResponse> {
        debug!(
            method = request.method().as_str(),
            path = request.path(),
            "sending request"
        );

        self.send_with_retry(&request).await
    }

    fn base_url(&self) -> &str {
        &self.config.base_url
    }
}
