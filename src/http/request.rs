//! HTTP request types for the Metigan API.
//!
//! This module provides type-safe request building for Metigan API calls.

use http::HeaderMap;
use serde::Serialize;

use crate::error::{MetiganError, MetiganResult};

/// HTTP methods used by the Metigan API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET request
    GET,
    /// POST request
    POST,
    /// PUT request
    PUT,
    /// DELETE request
    DELETE,
    /// PATCH request
    PATCH,
}

impl HttpMethod {
    /// The method name as a static string.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::PATCH => "PATCH",
        }
    }
}

/// One part of a multipart/form-data body.
#[derive(Debug, Clone)]
pub struct FormPart {
    /// Form field name.
    pub name: String,
    /// Filename, present for file parts.
    pub filename: Option<String>,
    /// MIME type of the part, when known.
    pub content_type: Option<String>,
    /// Raw part bytes.
    pub value: Vec<u8>,
}

impl FormPart {
    /// A plain text form field.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filename: None,
            content_type: None,
            value: value.into().into_bytes(),
        }
    }

    /// A file form field.
    pub fn file(
        name: impl Into<String>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        value: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            filename: Some(filename.into()),
            content_type: Some(content_type.into()),
            value,
        }
    }
}

/// Request body.
///
/// Bodies are held in a cloneable form so every retry attempt can rebuild
/// the wire body from scratch; multipart forms in particular cannot be
/// replayed once consumed.
#[derive(Debug, Clone, Default)]
pub enum Body {
    /// No body.
    #[default]
    Empty,
    /// Serialized JSON bytes.
    Json(Vec<u8>),
    /// Parts of a multipart/form-data body.
    Multipart(Vec<FormPart>),
}

/// A request to the Metigan API.
///
/// This struct represents a complete HTTP request with all necessary
/// components for making a Metigan API call.
///
/// # Examples
///
/// ```rust
/// use metigan::http::ApiRequest;
///
/// let request = ApiRequest::get("/api/contacts")
///     .query("page", "1")
///     .query("limit", "50");
/// ```
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method
    method: HttpMethod,

    /// Request path (e.g., "/api/email/send")
    path: String,

    /// Query parameters
    query_params: Vec<(String, String)>,

    /// HTTP headers
    headers: HeaderMap,

    /// Request body
    body: Body,
}

impl ApiRequest {
    /// Create a new GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::GET, path)
    }

    /// Create a new POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::POST, path)
    }

    /// Create a new PUT request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::PUT, path)
    }

    /// Create a new DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::DELETE, path)
    }

    /// Create a new request with the specified method.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query_params: Vec::new(),
            headers: HeaderMap::new(),
            body: Body::Empty,
        }
    }

    /// Add a query parameter to the request.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((key.into(), value.into()));
        self
    }

    /// Add a header to the request.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the name or value is not a legal
    /// HTTP header.
    pub fn header(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> MetiganResult<Self> {
        let header_name = http::header::HeaderName::from_bytes(key.as_ref().as_bytes())
            .map_err(|e| MetiganError::Validation {
                message: format!("Invalid header name: {}", e),
                field: Some("header".to_string()),
            })?;

        let header_value = http::header::HeaderValue::from_str(value.as_ref()).map_err(|e| {
            MetiganError::Validation {
                message: format!("Invalid header value: {}", e),
                field: Some("header".to_string()),
            }
        })?;

        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Set the request body as JSON.
    ///
    /// Serializes the provided value and marks the request as
    /// `application/json`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use metigan::http::ApiRequest;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let request = ApiRequest::post("/api/contacts")
    ///     .json(&serde_json::json!({"email": "ada@example.com"}))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn json<T: Serialize>(mut self, json: &T) -> MetiganResult<Self> {
        let body = serde_json::to_vec(json)?;
        self.body = Body::Json(body);
        Ok(self)
    }

    /// Set the request body as multipart/form-data.
    pub fn multipart(mut self, parts: Vec<FormPart>) -> Self {
        self.body = Body::Multipart(parts);
        self
    }

    /// Get the HTTP method.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Get the request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get the query parameters.
    pub fn query_params(&self) -> &[(String, String)] {
        &self.query_params
    }

    /// Get the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the request body.
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Build the full URL for this request.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use metigan::http::ApiRequest;
    ///
    /// let request = ApiRequest::get("/api/contacts").query("page", "2");
    /// let url = request.build_url("https://api.metigan.com");
    /// assert_eq!(url, "https://api.metigan.com/api/contacts?page=2");
    /// ```
    pub fn build_url(&self, base_url: &str) -> String {
        let mut url = format!("{}{}", base_url, self.path);

        if !self.query_params.is_empty() {
            url.push('?');
            // Percent-encode so caller-supplied values with `&`, `=`, or
            // spaces cannot splice extra parameters into the query string.
            let query_string = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(
                    self.query_params
                        .iter()
                        .map(|(k, v)| (k.as_str(), v.as_str())),
                )
                .finish();
            url.push_str(&query_string);
        }

        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[test]
    fn test_http_method_as_str() {
        assert_eq!(HttpMethod::GET.as_str(), "GET");
        assert_eq!(HttpMethod::POST.as_str(), "POST");
        assert_eq!(HttpMethod::PUT.as_str(), "PUT");
        assert_eq!(HttpMethod::DELETE.as_str(), "DELETE");
        assert_eq!(HttpMethod::PATCH.as_str(), "PATCH");
    }

    #[test]
    fn test_api_request_get() {
        let request = ApiRequest::get("/api/contacts");
        assert_eq!(request.method(), HttpMethod::GET);
        assert_eq!(request.path(), "/api/contacts");
        assert!(matches!(request.body(), Body::Empty));
    }

    #[test]
    fn test_api_request_query() {
        let request = ApiRequest::get("/api/contacts")
            .query("page", "1")
            .query("limit", "50");

        assert_eq!(request.query_params().len(), 2);
        assert_eq!(
            request.query_params()[0],
            ("page".to_string(), "1".to_string())
        );
    }

    #[test]
    fn test_api_request_header() {
        let request = ApiRequest::post("/api/email/send")
            .header("Idempotency-Key", "abc-123")
            .unwrap();

        assert!(request.headers().contains_key("idempotency-key"));
    }

    #[test]
    fn test_api_request_header_rejects_bad_name() {
        let result = ApiRequest::get("/api/contacts").header("bad header", "x");
        assert!(matches!(result, Err(MetiganError::Validation { .. })));
    }

    #[test]
    fn test_api_request_json() {
        #[derive(Serialize)]
        struct TestData {
            name: String,
            value: i32,
        }

        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };

        let request = ApiRequest::post("/api/contacts").json(&data).unwrap();

        match request.body() {
            Body::Json(bytes) => {
                let parsed: serde_json::Value = serde_json::from_slice(bytes).unwrap();
                assert_eq!(parsed["name"], "test");
                assert_eq!(parsed["value"], 42);
            }
            other => panic!("expected json body, got {:?}", other),
        }
    }

    #[test]
    fn test_api_request_multipart() {
        let request = ApiRequest::post("/api/email/send").multipart(vec![
            FormPart::text("from", "a@example.com"),
            FormPart::file("attachments", "report.pdf", "application/pdf", vec![1, 2]),
        ]);

        match request.body() {
            Body::Multipart(parts) => {
                assert_eq!(parts.len(), 2);
                assert_eq!(parts[1].filename.as_deref(), Some("report.pdf"));
            }
            other => panic!("expected multipart body, got {:?}", other),
        }
    }

    #[test]
    fn test_api_request_build_url() {
        let request = ApiRequest::get("/api/contacts")
            .query("page", "1")
            .query("limit", "50");

        let url = request.build_url("https://api.metigan.com");
        assert_eq!(url, "https://api.metigan.com/api/contacts?page=1&limit=50");
    }

    #[test]
    fn test_api_request_build_url_encodes_reserved_characters() {
        let request = ApiRequest::get("/api/contacts/search")
            .query("q", "a&b")
            .query("tag", "summer sale");

        let url = request.build_url("https://api.metigan.com");
        assert_eq!(
            url,
            "https://api.metigan.com/api/contacts/search?q=a%26b&tag=summer+sale"
        );
    }

    #[test]
    fn test_api_request_build_url_no_query() {
        let request = ApiRequest::get("/api/templates");
        let url = request.build_url("https://api.metigan.com");
        assert_eq!(url, "https://api.metigan.com/api/templates");
    }
}
