//! HTTP response handling for the Metigan API.
//!
//! This module provides response parsing and error extraction for Metigan
//! API calls.

use std::collections::HashMap;

use http::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{MetiganError, MetiganResult};

/// A response from the Metigan API.
///
/// Wraps the HTTP response and provides convenient methods for parsing
/// JSON data and extracting error details.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    status: StatusCode,

    /// Response headers, lowercase names
    headers: HashMap<String, String>,

    /// Response body
    body: Vec<u8>,
}

impl ApiResponse {
    /// Create a new response.
    pub fn new(status: StatusCode, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create a response from a reqwest Response.
    ///
    /// # Errors
    ///
    /// Returns a transport error if reading the body fails.
    pub async fn from_reqwest(response: reqwest::Response) -> MetiganResult<Self> {
        let status = response.status();

        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(value_str) = value.to_str() {
                headers.insert(name.as_str().to_lowercase(), value_str.to_string());
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| MetiganError::Transport {
                message: format!("Failed to read response body: {}", e),
                source: Some(Box::new(e)),
                retryable: true,
            })?
            .to_vec();

        Ok(Self::new(status, headers, body))
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|s| s.as_str())
    }

    /// Get the response body as bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Get the response body as a UTF-8 string.
    pub fn body_string(&self) -> MetiganResult<&str> {
        std::str::from_utf8(&self.body).map_err(|e| MetiganError::Serialization {
            message: format!("Response body is not valid UTF-8: {}", e),
        })
    }

    /// Parse the response body as JSON.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use metigan::http::ApiResponse;
    /// use http::StatusCode;
    /// use std::collections::HashMap;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let body = br#"{"success": true}"#.to_vec();
    /// let response = ApiResponse::new(StatusCode::OK, HashMap::new(), body);
    ///
    /// let data: serde_json::Value = response.json()?;
    /// assert_eq!(data["success"], true);
    /// # Ok(())
    /// # }
    /// ```
    pub fn json<T: DeserializeOwned>(&self) -> MetiganResult<T> {
        serde_json::from_slice(&self.body).map_err(Into::into)
    }

    /// Check if the response indicates success (2xx).
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Extract error information from a failed response.
    ///
    /// The Metigan API reports errors as a JSON envelope carrying a
    /// `message` (sometimes `error`) and occasionally a `data` payload.
    /// Bodies that are not JSON fall back to a status-code error.
    pub fn into_error(self) -> MetiganError {
        if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(&self.body) {
            if envelope.message.is_some() || envelope.error.is_some() {
                return self.error_from_envelope(envelope);
            }
        }

        self.error_from_status_code()
    }

    fn error_from_envelope(&self, envelope: ErrorEnvelope) -> MetiganError {
        let message = envelope
            .message
            .or(envelope.error)
            .unwrap_or_else(|| "Unknown error".to_string());

        MetiganError::Api {
            status: self.status.as_u16(),
            message,
            data: envelope.data,
        }
    }

    fn error_from_status_code(&self) -> MetiganError {
        let message = match self.body_string() {
            Ok(s) if !s.trim().is_empty() => s.to_string(),
            _ => format!("HTTP {}", self.status.as_u16()),
        };

        MetiganError::Api {
            status: self.status.as_u16(),
            message,
            data: None,
        }
    }
}

/// Error envelope returned by the Metigan API.
#[derive(Debug, Clone, Deserialize)]
struct ErrorEnvelope {
    /// Human-readable error message.
    message: Option<String>,

    /// Alternate key used by some endpoints.
    error: Option<String>,

    /// Structured error detail, when present.
    data: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_new() {
        let response = ApiResponse::new(StatusCode::OK, HashMap::new(), b"test body".to_vec());

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body(), b"test body");
        assert!(response.is_success());
    }

    #[test]
    fn test_api_response_header_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        let response = ApiResponse::new(StatusCode::OK, headers, vec![]);

        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.header("missing"), None);
    }

    #[test]
    fn test_api_response_json() {
        #[derive(Deserialize)]
        struct TestData {
            name: String,
        }

        let body = br#"{"name": "test"}"#.to_vec();
        let response = ApiResponse::new(StatusCode::OK, HashMap::new(), body);

        let data: TestData = response.json().unwrap();
        assert_eq!(data.name, "test");
    }

    #[test]
    fn test_into_error_with_message() {
        let body = br#"{"message": "Invalid recipient", "data": {"field": "to"}}"#.to_vec();
        let response = ApiResponse::new(StatusCode::BAD_REQUEST, HashMap::new(), body);

        match response.into_error() {
            MetiganError::Api {
                status,
                message,
                data,
            } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid recipient");
                assert_eq!(data.unwrap()["field"], "to");
            }
            other => panic!("expected api error, got {:?}", other),
        }
    }

    #[test]
    fn test_into_error_with_error_key() {
        let body = br#"{"error": "Forbidden"}"#.to_vec();
        let response = ApiResponse::new(StatusCode::FORBIDDEN, HashMap::new(), body);

        match response.into_error() {
            MetiganError::Api {
                status, message, ..
            } => {
                assert_eq!(status, 403);
                assert_eq!(message, "Forbidden");
            }
            other => panic!("expected api error, got {:?}", other),
        }
    }

    #[test]
    fn test_into_error_non_json_body() {
        let response = ApiResponse::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            HashMap::new(),
            b"Internal error".to_vec(),
        );
        let error = response.into_error();

        assert!(error.is_retryable());
        assert_eq!(error.status(), Some(500));
    }

    #[test]
    fn test_into_error_empty_body() {
        let response = ApiResponse::new(StatusCode::BAD_GATEWAY, HashMap::new(), vec![]);

        match response.into_error() {
            MetiganError::Api { message, .. } => assert_eq!(message, "HTTP 502"),
            other => panic!("expected api error, got {:?}", other),
        }
    }

    #[test]
    fn test_into_error_429_is_retryable() {
        let body = br#"{"message": "Too many requests"}"#.to_vec();
        let response = ApiResponse::new(StatusCode::TOO_MANY_REQUESTS, HashMap::new(), body);

        assert!(response.into_error().is_retryable());
    }
}
