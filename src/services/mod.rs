//! Service layer for the Metigan API.
//!
//! Each service wraps one resource family of the API and shares the same
//! plumbing: an [`HttpClient`] for transport, a [`DebugLogger`] for
//! diagnostics, and a [`UsageLogger`] that records every call.

pub mod audiences;
pub mod contacts;
pub mod emails;
pub mod forms;
pub mod payload;
pub mod templates;

pub use audiences::AudienceService;
pub use contacts::ContactService;
pub use emails::EmailService;
pub use forms::FormService;
pub use payload::{JsonPayloadEncoder, MultipartPayloadEncoder, PayloadEncoder};
pub use templates::{render, TemplateService};

use std::sync::Arc;

use crate::error::MetiganResult;
use crate::http::{ApiRequest, ApiResponse, HttpClient};
use crate::logging::{DebugLogger, UsageLogger, UsageRecord};

/// Shared per-service plumbing.
#[derive(Clone)]
pub(crate) struct ServiceContext {
    pub http: Arc<dyn HttpClient>,
    pub logger: DebugLogger,
    pub usage: Arc<UsageLogger>,
}

impl ServiceContext {
    /// Send a request, logging it and recording a usage entry whether it
    /// succeeds or fails.
    pub async fn send(&self, request: ApiRequest) -> MetiganResult<ApiResponse> {
        let method = request.method().as_str();
        let path = request.path().to_string();

        self.logger.log(&format!("{} {}", method, path));

        let result = self.http.send_request(request).await;

        let status = match &result {
            Ok(response) => response.status().as_u16(),
            // Status 0 marks calls that never produced an HTTP status.
            Err(error) => error.status().unwrap_or(0),
        };
        self.usage.record(UsageRecord::new(path, method, status)).await;

        result
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Shared fixtures for service tests.

    use super::*;
    use crate::config::MetiganConfig;
    use crate::http::MetiganHttpClient;
    use wiremock::MockServer;

    /// A context wired to a wiremock server, telemetry disabled.
    pub async fn mock_context(server: &MockServer) -> ServiceContext {
        let config = MetiganConfig::builder()
            .api_key("mg_test_key")
            .base_url(server.uri())
            .retry_count(1)
            .disable_rate_limit()
            .disable_logs()
            .build()
            .unwrap();

        ServiceContext {
            http: Arc::new(MetiganHttpClient::new(config).unwrap()),
            logger: DebugLogger::new(false),
            usage: Arc::new(UsageLogger::disabled()),
        }
    }
}
