//! End-to-end tests driving the public client against a mock server.

use std::time::Duration;

use metigan::{
    EmailBuilder, MetiganClient, MetiganError, PageQuery, RetryConfig, SendTransactionalRequest,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_retry() -> RetryConfig {
    RetryConfig {
        max_attempts: 3,
        base_delay: Duration::from_millis(10),
        max_backoff: Duration::from_millis(50),
        jitter: false,
    }
}

async fn client_for(server: &MockServer) -> MetiganClient {
    MetiganClient::builder()
        .api_key("mg_test_key")
        .base_url(server.uri())
        .retry_config(fast_retry())
        .disable_rate_limit()
        .disable_logs()
        .build()
        .unwrap()
}

#[tokio::test]
async fn send_email_carries_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/email/send"))
        .and(header("x-api-key", "mg_test_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "messageId": "msg_1",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    let request = EmailBuilder::new()
        .from("hello@acme.com")
        .to("ada@example.com")
        .subject("Hi")
        .text("body")
        .build()
        .unwrap();

    let response = client.send_email(request).await.unwrap();
    assert!(response.success);
    assert_eq!(response.message_id.as_deref(), Some("msg_1"));

    client.shutdown().await;
}

#[tokio::test]
async fn transient_server_errors_are_retried_until_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/email/send"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/email/send"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    let request = EmailBuilder::new()
        .from("hello@acme.com")
        .to("ada@example.com")
        .subject("Hi")
        .text("body")
        .build()
        .unwrap();

    let response = client.send_email(request).await.unwrap();
    assert!(response.success);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/contacts/absent"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"message": "Contact not found"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let error = client.contacts().get("absent").await.unwrap_err();

    assert_eq!(error.status(), Some(404));
    assert!(!error.is_retryable());
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn outbound_html_is_sanitized_before_sending() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/email/send"))
        .and(body_partial_json(serde_json::json!({
            "html": "<p>ok</p>",
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    let request = EmailBuilder::new()
        .from("hello@acme.com")
        .to("ada@example.com")
        .subject("Hi")
        .html("<script>alert(1)</script><p>ok</p>")
        .build()
        .unwrap();

    assert!(client.send_email(request).await.is_ok());
}

#[tokio::test]
async fn validation_failures_never_touch_the_network() {
    let server = MockServer::start().await;
    let client = client_for(&server).await;

    let request = EmailBuilder::new()
        .from("not-an-address")
        .to("ada@example.com")
        .subject("Hi")
        .text("body")
        .build()
        .unwrap();

    let error = client.send_email(request).await.unwrap_err();
    assert!(matches!(error, MetiganError::Validation { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn transactional_send_hits_fast_lane_path() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/email/transactional"))
        .and(body_partial_json(serde_json::json!({
            "idempotencyKey": "order-42",
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    let response = client
        .send_transactional(SendTransactionalRequest {
            from: "receipts@acme.com".to_string(),
            to: "ada@example.com".to_string(),
            subject: "Your order".to_string(),
            html: None,
            text: Some("shipped".to_string()),
            template_id: None,
            variables: None,
            idempotency_key: Some("order-42".to_string()),
        })
        .await
        .unwrap();

    assert!(response.success);
}

#[tokio::test]
async fn usage_telemetry_is_flushed_on_shutdown() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/templates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [], "total": 0, "page": 1, "limit": 50,
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1..)
        .mount(&server)
        .await;

    let client = MetiganClient::builder()
        .api_key("mg_test_key")
        .base_url(server.uri())
        .user_id("user_1")
        .retry_config(fast_retry())
        .disable_rate_limit()
        .usage_flush_interval(Duration::from_secs(3600))
        .build()
        .unwrap();

    client.templates().list(PageQuery::default()).await.unwrap();
    client.shutdown().await;

    let logged = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == "/api/logs")
        .count();
    assert!(logged >= 1);
}

#[tokio::test]
async fn failed_telemetry_does_not_break_operations() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/templates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [], "total": 0, "page": 1, "limit": 50,
        })))
        .mount(&server)
        .await;

    // The logs endpoint rejecting the key must stay invisible to callers.
    Mock::given(method("POST"))
        .and(path("/api/logs"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = MetiganClient::builder()
        .api_key("mg_test_key")
        .base_url(server.uri())
        .retry_config(fast_retry())
        .disable_rate_limit()
        .usage_flush_interval(Duration::from_millis(20))
        .build()
        .unwrap();

    let page = client.templates().list(PageQuery::default()).await.unwrap();
    assert_eq!(page.total, 0);

    tokio::time::sleep(Duration::from_millis(100)).await;
    client.shutdown().await;
}
