//! Metigan client implementation.
//!
//! The [`MetiganClient`] struct is the main entry point for all
//! operations. Service objects are lazily initialized, created only when
//! first accessed, and share the client's HTTP transport, rate limiter
//! state, and telemetry pipeline.
//!
//! # Example
//!
//! ```rust,no_run
//! use metigan::{EmailBuilder, MetiganClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = MetiganClient::builder()
//!     .api_key("mg_live_xxx")
//!     .build()?;
//!
//! let request = EmailBuilder::new()
//!     .from("sender@example.com")
//!     .to("recipient@example.com")
//!     .subject("Hello")
//!     .text("Email body")
//!     .build()?;
//!
//! let response = client.send_email(request).await?;
//! println!("queued: {:?}", response.message_id);
//!
//! client.shutdown().await;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;

use crate::config::{MetiganConfig, MetiganConfigBuilder, RateLimitConfig, RetryConfig};
use crate::error::MetiganResult;
use crate::http::{HttpClient, MetiganHttpClient, ReqwestTransport, Transport};
use crate::logging::{DebugLogger, UsageLogger};
use crate::services::{
    AudienceService, ContactService, EmailService, FormService, ServiceContext, TemplateService,
};
use crate::types::attachment::AttachmentEncoding;
use crate::types::{SendEmailRequest, SendEmailResponse, SendOtpRequest, SendTransactionalRequest};

/// Main client for the Metigan API.
///
/// # Thread Safety
///
/// `MetiganClient` is `Send + Sync`; wrap it in an `Arc` to share it
/// across tasks. All services hand out shared references and hold no
/// mutable state of their own.
pub struct MetiganClient {
    config: Arc<MetiganConfig>,

    /// Transport-level client used by the CRUD services.
    http: Arc<dyn HttpClient>,

    /// Separate client for the email send path, whose retry delays carry
    /// full jitter to spread out batch send spikes.
    email_http: Arc<dyn HttpClient>,

    logger: DebugLogger,
    usage: Arc<UsageLogger>,

    emails: OnceCell<EmailService>,
    contacts: OnceCell<ContactService>,
    audiences: OnceCell<AudienceService>,
    forms: OnceCell<FormService>,
    templates: OnceCell<TemplateService>,
}

impl std::fmt::Debug for MetiganClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Config's own Debug impl redacts the API key.
        f.debug_struct("MetiganClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl MetiganClient {
    /// Create a client from a finished configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be initialized.
    pub fn new(config: MetiganConfig) -> MetiganResult<Self> {
        let transport: Arc<dyn Transport> =
            ReqwestTransport::new(config.timeout, config.connect_timeout)?.into_shared();

        let http: Arc<dyn HttpClient> = Arc::new(MetiganHttpClient::with_transport(
            config.clone(),
            Arc::clone(&transport),
        ));

        let mut email_config = config.clone();
        email_config.retry_config.jitter = true;
        let email_http: Arc<dyn HttpClient> = Arc::new(MetiganHttpClient::with_transport(
            email_config,
            Arc::clone(&transport),
        ));

        // Telemetry bypasses the caller's rate limiter so flushes never
        // eat into the request budget.
        let mut telemetry_config = config.clone();
        telemetry_config.rate_limit = None;
        let telemetry_http: Arc<dyn HttpClient> = Arc::new(MetiganHttpClient::with_transport(
            telemetry_config,
            Arc::clone(&transport),
        ));

        let logger = DebugLogger::new(config.debug);
        let usage = Arc::new(UsageLogger::start(&config, telemetry_http));

        Ok(Self {
            config: Arc::new(config),
            http,
            email_http,
            logger,
            usage,
            emails: OnceCell::new(),
            contacts: OnceCell::new(),
            audiences: OnceCell::new(),
            forms: OnceCell::new(),
            templates: OnceCell::new(),
        })
    }

    /// Create a new client builder.
    pub fn builder() -> MetiganClientBuilder {
        MetiganClientBuilder::default()
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &MetiganConfig {
        &self.config
    }

    fn context(&self, http: &Arc<dyn HttpClient>) -> ServiceContext {
        ServiceContext {
            http: Arc::clone(http),
            logger: self.logger.clone(),
            usage: Arc::clone(&self.usage),
        }
    }

    /// Email sending operations.
    pub fn emails(&self) -> &EmailService {
        self.emails.get_or_init(|| {
            EmailService::new(
                self.context(&self.email_http),
                self.config.sanitize_html,
                self.config.attachment_encoding,
            )
        })
    }

    /// Contact management operations.
    pub fn contacts(&self) -> &ContactService {
        self.contacts
            .get_or_init(|| ContactService::new(self.context(&self.http)))
    }

    /// Audience management operations.
    pub fn audiences(&self) -> &AudienceService {
        self.audiences
            .get_or_init(|| AudienceService::new(self.context(&self.http)))
    }

    /// Hosted form operations.
    pub fn forms(&self) -> &FormService {
        self.forms
            .get_or_init(|| FormService::new(self.context(&self.http)))
    }

    /// Template operations.
    pub fn templates(&self) -> &TemplateService {
        self.templates
            .get_or_init(|| TemplateService::new(self.context(&self.http)))
    }

    /// Send an email. Shorthand for `client.emails().send_email(...)`.
    pub async fn send_email(&self, request: SendEmailRequest) -> MetiganResult<SendEmailResponse> {
        self.emails().send_email(request).await
    }

    /// Send a one-time passcode. Shorthand for `client.emails().send_otp(...)`.
    pub async fn send_otp(&self, request: SendOtpRequest) -> MetiganResult<SendEmailResponse> {
        self.emails().send_otp(request).await
    }

    /// Send a transactional email. Shorthand for
    /// `client.emails().send_transactional(...)`.
    pub async fn send_transactional(
        &self,
        request: SendTransactionalRequest,
    ) -> MetiganResult<SendEmailResponse> {
        self.emails().send_transactional(request).await
    }

    /// Flush buffered telemetry and stop background work.
    ///
    /// Call this before dropping the client at process exit; otherwise
    /// the last batch of usage records may be lost.
    pub async fn shutdown(&self) {
        self.usage.shutdown().await;
    }
}

/// Builder for [`MetiganClient`].
///
/// Thin wrapper over [`MetiganConfigBuilder`] that finishes by
/// constructing the client.
#[derive(Default)]
pub struct MetiganClientBuilder {
    config: MetiganConfigBuilder,
}

impl MetiganClientBuilder {
    /// Set the API key. Required.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config = self.config.api_key(key);
        self
    }

    /// Attach an account user id to telemetry records.
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.config = self.config.user_id(user_id);
        self
    }

    /// Override the API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config = self.config.base_url(url);
        self
    }

    /// Set the total request timeout.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.config = self.config.timeout(duration);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.config = self.config.connect_timeout(duration);
        self
    }

    /// Set the maximum number of attempts per request.
    pub fn retry_count(mut self, count: u32) -> Self {
        self.config = self.config.retry_count(count);
        self
    }

    /// Set the base delay of the retry backoff.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.config = self.config.retry_delay(delay);
        self
    }

    /// Replace the whole retry policy.
    pub fn retry_config(mut self, retry: RetryConfig) -> Self {
        self.config = self.config.retry_config(retry);
        self
    }

    /// Cap request throughput with a one-second sliding window.
    pub fn max_requests_per_second(mut self, max: u32) -> Self {
        self.config = self.config.max_requests_per_second(max);
        self
    }

    /// Replace the whole rate limit policy.
    pub fn rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.config = self.config.rate_limit(rate_limit);
        self
    }

    /// Disable client-side rate limiting.
    pub fn disable_rate_limit(mut self) -> Self {
        self.config = self.config.disable_rate_limit();
        self
    }

    /// Toggle outbound HTML sanitization. Enabled by default.
    pub fn sanitize_html(mut self, enabled: bool) -> Self {
        self.config = self.config.sanitize_html(enabled);
        self
    }

    /// Disable usage telemetry.
    pub fn disable_logs(mut self) -> Self {
        self.config = self.config.disable_logs();
        self
    }

    /// Enable verbose diagnostic logging.
    pub fn debug(mut self, enabled: bool) -> Self {
        self.config = self.config.debug(enabled);
        self
    }

    /// Choose how attachments are encoded on the wire.
    pub fn attachment_encoding(mut self, encoding: AttachmentEncoding) -> Self {
        self.config = self.config.attachment_encoding(encoding);
        self
    }

    /// Set the telemetry flush interval.
    pub fn usage_flush_interval(mut self, interval: Duration) -> Self {
        self.config = self.config.usage_flush_interval(interval);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Fails synchronously when the API key is missing or empty, or the
    /// base URL does not parse.
    pub fn build(self) -> MetiganResult<MetiganClient> {
        let config = self.config.build()?;
        MetiganClient::new(config)
    }
}
