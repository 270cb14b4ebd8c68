//! Transport layer abstraction for HTTP communication.
//!
//! This module provides a pluggable transport layer for sending HTTP
//! requests. The default implementation uses reqwest, but other
//! implementations can be provided for testing or alternative backends.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Request, Response};

use crate::error::{MetiganError, MetiganResult};

/// Trait for HTTP transport implementations.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or times out.
    async fn send(&self, request: Request) -> MetiganResult<Response>;

    /// Get a reference to the underlying reqwest client.
    ///
    /// Multipart bodies are assembled through this client so the
    /// transport and the request builder share connection state.
    fn client(&self) -> &Client;
}

/// Reqwest-based HTTP transport implementation.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a new reqwest transport.
    ///
    /// # Arguments
    ///
    /// * `timeout` - Request timeout duration
    /// * `connect_timeout` - Connection timeout duration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the underlying client cannot be
    /// constructed.
    pub fn new(timeout: Duration, connect_timeout: Duration) -> MetiganResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .build()
            .map_err(|e| MetiganError::Transport {
                message: format!("Failed to create HTTP client: {}", e),
                source: Some(Box::new(e)),
                retryable: false,
            })?;

        Ok(Self { client })
    }

    /// Wrap the transport in an `Arc<dyn Transport>`.
    pub fn into_shared(self) -> Arc<dyn Transport> {
        Arc::new(self)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: Request) -> MetiganResult<Response> {
        self.client.execute(request).await.map_err(Into::into)
    }

    fn client(&self) -> &Client {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reqwest_transport_creation() {
        let transport = ReqwestTransport::new(Duration::from_secs(30), Duration::from_secs(10));
        assert!(transport.is_ok());
    }

    #[tokio::test]
    async fn test_transport_trait_object() {
        let transport = ReqwestTransport::new(Duration::from_secs(30), Duration::from_secs(10))
            .unwrap()
            .into_shared();

        let _: &dyn Transport = &*transport;
    }
}
