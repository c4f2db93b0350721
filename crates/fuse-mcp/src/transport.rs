//! HTTP transport for JSON-RPC requests.
//!
//! One POST per call, no retries. The HTTP status does not decide success:
//! the body is parsed as JSON whatever the status, since JSON-RPC servers
//! commonly report errors in a 4xx/5xx body.

use std::time::Duration;

use async_trait::async_trait;
use fuse_session::DebugLog;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

use crate::error::TransportError;

/// Default timeout for `tools/call` requests.
pub const TOOL_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for connectivity probes.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends a JSON payload and returns the parsed JSON reply.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(
        &self,
        url: &str,
        body: &Value,
        timeout: Duration,
    ) -> Result<Value, TransportError>;
}

/// [`Transport`] over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    debug_log: DebugLog,
}

impl HttpTransport {
    /// Create a transport that records traffic in `debug_log`.
    pub fn new(debug_log: DebugLog) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(format!("fuse/{}", env!("CARGO_PKG_VERSION")))
            .pool_max_idle_per_host(2)
            .build()
            .map_err(|e| TransportError::other(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, debug_log })
    }

    async fn send(
        &self,
        url: url::Url,
        body: String,
        timeout: Duration,
    ) -> Result<Value, TransportError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(e, timeout))?;

        let status = response.status();
        self.debug_log.info(format!("Response status: {}", status.as_u16()));

        let text = response
            .text()
            .await
            .map_err(|e| TransportError::from_reqwest(e, timeout))?;

        self.debug_log.info(format!("Response: {}", text));
        tracing::trace!(status = status.as_u16(), json = %text, "received JSON-RPC response");

        serde_json::from_str(&text).map_err(|e| TransportError::protocol(e.to_string()))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(
        &self,
        url: &str,
        body: &Value,
        timeout: Duration,
    ) -> Result<Value, TransportError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(TransportError::other("empty URL"));
        }
        let parsed = url::Url::parse(url)
            .map_err(|e| TransportError::other(format!("invalid URL '{}': {}", url, e)))?;

        let json = serde_json::to_string(body)
            .map_err(|e| TransportError::other(format!("failed to encode request: {}", e)))?;
        let pretty = serde_json::to_string_pretty(body).unwrap_or_else(|_| json.clone());
        self.debug_log.info(format!("Request: {}", pretty));

        tracing::debug!(
            url = %parsed,
            timeout_ms = timeout.as_millis() as u64,
            "sending JSON-RPC request"
        );

        let result = self.send(parsed, json, timeout).await;
        if let Err(err) = &result {
            self.debug_log.error(format!("Request failed: {}", err));
        }
        result
    }
}
