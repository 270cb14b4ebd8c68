//! HTTP module for Metigan API communication.
//!
//! This module provides the HTTP plumbing shared by every service:
//!
//! - **Transport Layer**: Pluggable transport implementations (reqwest by default)
//! - **HTTP Client**: High-level client with authentication, retry logic, and rate limiting
//! - **Request/Response**: Type-safe request building and response parsing

mod client;
mod request;
mod response;
mod transport;

pub use client::{user_agent, MetiganHttpClient, API_KEY_HEADER};
pub use request::{ApiRequest, Body, FormPart, HttpMethod};
pub use response::ApiResponse;
pub use transport::{ReqwestTransport, Transport};

use async_trait::async_trait;

use crate::error::MetiganResult;

/// Trait for HTTP clients that can send Metigan API requests.
///
/// Services depend on this trait rather than a concrete client, so tests
/// can substitute a mock implementation.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The client-side rate limiter denies the request
    /// - Network communication fails
    /// - The server returns an error response after the retry budget
    async fn send_request(&self, request: ApiRequest) -> MetiganResult<ApiResponse>;

    /// Get the base URL for this client.
    fn base_url(&self) -> &str;
}
