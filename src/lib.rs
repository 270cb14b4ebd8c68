//! Metigan SDK for Rust
//!
//! Type-safe client for the Metigan email and marketing-automation API.
//!
//! # Features
//!
//! - **Email sending**: full send path plus OTP and transactional fast lanes
//! - **Marketing resources**: contacts, audiences, hosted forms, templates
//! - **Resilience**: automatic retry with exponential backoff and a
//!   client-side sliding-window rate limiter
//! - **Safety gates**: address validation, subject and HTML sanitization,
//!   attachment extension and size limits, all applied before any network call
//! - **Telemetry**: best-effort batched usage logging that never fails a send
//! - **Async/Await**: built on Tokio and reqwest
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use metigan::{EmailBuilder, MetiganClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MetiganClient::builder()
//!         .api_key("mg_live_xxx")
//!         .build()?;
//!
//!     let request = EmailBuilder::new()
//!         .from("Acme <hello@acme.com>")
//!         .to("recipient@example.com")
//!         .subject("Hello from Metigan")
//!         .text("This is a test email.")
//!         .build()?;
//!
//!     let response = client.send_email(request).await?;
//!     println!("Message sent! ID: {:?}", response.message_id);
//!
//!     client.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! # Service Access
//!
//! The client exposes one service per resource family, created lazily on
//! first access:
//!
//! ```rust,no_run
//! # use metigan::MetiganClient;
//! # async fn example(client: &MetiganClient) {
//! let emails = client.emails();
//! let contacts = client.contacts();
//! let audiences = client.audiences();
//! let forms = client.forms();
//! let templates = client.templates();
//! # }
//! ```
//!
//! # Standalone Utilities
//!
//! The sanitizers and the rate limiter are usable without a client:
//!
//! ```rust
//! use metigan::sanitize::{is_valid_email, sanitize_html};
//!
//! assert!(is_valid_email("ada@example.com"));
//! assert_eq!(sanitize_html("<script>x</script><p>ok</p>"), "<p>ok</p>");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod builders;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod sanitize;
pub mod services;
pub mod types;

// Main client
pub use client::{MetiganClient, MetiganClientBuilder};

// Configuration
pub use config::{MetiganConfig, MetiganConfigBuilder, RateLimitConfig, RateLimiter, RetryConfig};

// Errors
pub use error::{MetiganError, MetiganResult};

// HTTP plumbing
pub use http::{ApiRequest, ApiResponse, HttpClient, HttpMethod, MetiganHttpClient};

// Services
pub use services::{
    AudienceService, ContactService, EmailService, FormService, TemplateService,
};

// Request and response types
pub use types::{
    Ack, Attachment, AttachmentContent, AttachmentEncoding, Audience, AudienceStats,
    BulkImportResult, Contact, CreateAudienceRequest, CreateContactRequest, CreateFormRequest,
    CreateTemplateRequest, Form, FormField, FormFieldType, FormSubmission, Page, PageQuery,
    SendEmailRequest, SendEmailResponse, SendOtpRequest, SendTransactionalRequest, Template,
    UpdateAudienceRequest, UpdateContactRequest, UpdateFormRequest, UpdateTemplateRequest,
};

// Builders
pub use builders::{BuilderError, EmailBuilder};

// Standalone sanitizers
pub use sanitize::{extract_address, is_valid_email, sanitize_email, sanitize_html, sanitize_subject};
