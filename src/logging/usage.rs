//! Batched usage telemetry.
//!
//! Every successful or failed API call may record a small usage entry.
//! Records are buffered on an unbounded channel and flushed by a
//! background task on a fixed interval, one flush in flight at a time.
//! Telemetry is strictly best effort: a failed flush drops its batch and
//! the SDK carries on.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::MetiganConfig;
use crate::http::{ApiRequest, HttpClient};

/// Endpoint that receives usage batches.
const LOGS_PATH: &str = "/api/logs";

/// One recorded API call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    /// API path that was called.
    pub endpoint: String,
    /// HTTP method used.
    pub method: String,
    /// Final HTTP status, `0` when the call never reached the server.
    pub status: u16,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl UsageRecord {
    /// Record a call made just now.
    pub fn new(endpoint: impl Into<String>, method: impl Into<String>, status: u16) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        Self {
            endpoint: endpoint.into(),
            method: method.into(),
            status,
            timestamp,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UsageBatch<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
    records: &'a [UsageRecord],
}

/// Background usage logger.
///
/// Created disabled or enabled at client construction. When enabled it
/// owns a tokio task that drains the record channel and posts batches to
/// the API. [`UsageLogger::shutdown`] flushes whatever is still buffered.
pub struct UsageLogger {
    tx: Mutex<Option<mpsc::UnboundedSender<UsageRecord>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl UsageLogger {
    /// A logger that drops every record.
    pub fn disabled() -> Self {
        Self {
            tx: Mutex::new(None),
            handle: Mutex::new(None),
        }
    }

    /// Start the background flush task.
    ///
    /// The task wakes on `config.usage_flush_interval` and whenever the
    /// channel closes, which happens during shutdown. Requires a running
    /// tokio runtime; without one telemetry silently stays disabled.
    pub fn start(config: &MetiganConfig, http: Arc<dyn HttpClient>) -> Self {
        if config.disable_logs || tokio::runtime::Handle::try_current().is_err() {
            return Self::disabled();
        }

        let (tx, mut rx) = mpsc::unbounded_channel::<UsageRecord>();
        let flush_interval = config.usage_flush_interval;
        let user_id = config.user_id.clone();

        let handle = tokio::spawn(async move {
            let mut buffer: Vec<UsageRecord> = Vec::new();
            let mut interval = tokio::time::interval(flush_interval);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        flush(&*http, user_id.as_deref(), &mut buffer).await;
                    }
                    record = rx.recv() => match record {
                        Some(record) => buffer.push(record),
                        None => {
                            flush(&*http, user_id.as_deref(), &mut buffer).await;
                            break;
                        }
                    }
                }
            }
        });

        Self {
            tx: Mutex::new(Some(tx)),
            handle: Mutex::new(Some(handle)),
        }
    }

    /// Queue a record. A no-op when telemetry is disabled or shut down.
    pub async fn record(&self, record: UsageRecord) {
        let guard = self.tx.lock().await;
        if let Some(tx) = guard.as_ref() {
            // The receiver only disappears during shutdown; losing a
            // record then is acceptable.
            let _ = tx.send(record);
        }
    }

    /// Whether telemetry is active.
    pub async fn is_enabled(&self) -> bool {
        self.tx.lock().await.is_some()
    }

    /// Flush remaining records and stop the background task.
    ///
    /// Idempotent. After this call every `record` is a no-op.
    pub async fn shutdown(&self) {
        let tx = self.tx.lock().await.take();
        drop(tx);

        let handle = self.handle.lock().await.take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

async fn flush(http: &dyn HttpClient, user_id: Option<&str>, buffer: &mut Vec<UsageRecord>) {
    if buffer.is_empty() {
        return;
    }

    let batch = UsageBatch {
        user_id,
        records: buffer,
    };

    let request = match ApiRequest::post(LOGS_PATH).json(&batch) {
        Ok(request) => request,
        Err(e) => {
            debug!(target: "metigan", error = %e, "dropping usage batch, serialization failed");
            buffer.clear();
            return;
        }
    };

    // Failed batches are dropped rather than requeued so the buffer
    // cannot grow without bound behind a dead endpoint.
    if let Err(e) = http.send_request(request).await {
        debug!(
            target: "metigan",
            error = %e,
            records = buffer.len(),
            "usage flush failed"
        );
    }

    buffer.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MetiganConfig;
    use crate::error::MetiganResult;
    use crate::http::ApiResponse;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingClient {
        flushes: AtomicUsize,
        records_seen: AtomicUsize,
    }

    impl CountingClient {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                flushes: AtomicUsize::new(0),
                records_seen: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl HttpClient for CountingClient {
        async fn send_request(&self, request: ApiRequest) -> MetiganResult<ApiResponse> {
            assert_eq!(request.path(), LOGS_PATH);
            if let crate::http::Body::Json(bytes) = request.body() {
                let value: serde_json::Value = serde_json::from_slice(bytes).unwrap();
                let count = value["records"].as_array().unwrap().len();
                self.records_seen.fetch_add(count, Ordering::SeqCst);
            }
            self.flushes.fetch_add(1, Ordering::SeqCst);
            Ok(ApiResponse::new(
                http::StatusCode::OK,
                HashMap::new(),
                b"{}".to_vec(),
            ))
        }

        fn base_url(&self) -> &str {
            "http://localhost"
        }
    }

    fn config_with_interval(interval: Duration) -> MetiganConfig {
        MetiganConfig::builder()
            .api_key("mg_test_key")
            .usage_flush_interval(interval)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn shutdown_flushes_pending_records() {
        let http = CountingClient::new();
        let config = config_with_interval(Duration::from_secs(3600));
        let logger = UsageLogger::start(&config, http.clone());

        logger
            .record(UsageRecord::new("/api/email/send", "POST", 200))
            .await;
        logger
            .record(UsageRecord::new("/api/contacts", "GET", 200))
            .await;

        logger.shutdown().await;

        assert_eq!(http.records_seen.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn interval_flush_batches_records() {
        let http = CountingClient::new();
        let config = config_with_interval(Duration::from_millis(20));
        let logger = UsageLogger::start(&config, http.clone());

        logger
            .record(UsageRecord::new("/api/email/send", "POST", 200))
            .await;

        tokio::time::sleep(Duration::from_millis(120)).await;

        assert!(http.records_seen.load(Ordering::SeqCst) >= 1);
        // Empty ticks do not produce requests.
        assert!(http.flushes.load(Ordering::SeqCst) < 4);

        logger.shutdown().await;
    }

    #[tokio::test]
    async fn disabled_logger_never_sends() {
        let http = CountingClient::new();
        let logger = UsageLogger::disabled();

        assert!(!logger.is_enabled().await);
        logger
            .record(UsageRecord::new("/api/email/send", "POST", 200))
            .await;
        logger.shutdown().await;

        assert_eq!(http.flushes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let http = CountingClient::new();
        let config = config_with_interval(Duration::from_secs(3600));
        let logger = UsageLogger::start(&config, http.clone());

        logger.shutdown().await;
        logger.shutdown().await;
    }
}
