//! Tool-call client: the `initialize` probe and `tools/call`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use fuse_session::DebugLog;
use serde_json::Value;

use crate::error::{McpError, Result, TransportError};
use crate::protocol::{
    CallToolParams, CallToolResult, InitializeResult, JsonRpcRequest, error_message,
    response_error, response_result,
};
use crate::transport::{HttpTransport, PROBE_TIMEOUT, TOOL_CALL_TIMEOUT, Transport};

/// User-facing message for a timed-out tool call.
pub const TIMEOUT_MESSAGE: &str = "Request timed out. The server took too long to respond.";

/// User-facing message for an unreachable server.
pub const CONNECTION_MESSAGE: &str = "Connection failed. Check your server URL.";

/// Per-operation request timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTimeouts {
    pub tool_call: Duration,
    pub probe: Duration,
}

impl Default for RequestTimeouts {
    fn default() -> Self {
        Self {
            tool_call: TOOL_CALL_TIMEOUT,
            probe: PROBE_TIMEOUT,
        }
    }
}

/// Outcome of a connectivity probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionCheck {
    pub connected: bool,
    /// Human-readable summary, e.g. `Connected to Fuse`.
    pub message: String,
}

impl ConnectionCheck {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            connected: true,
            message: message.into(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            connected: false,
            message: message.into(),
        }
    }
}

/// Client for a JSON-RPC tool server.
///
/// Stateless between calls: the server URL is passed per call since it is
/// user-editable configuration.
pub struct McpClient {
    transport: Arc<dyn Transport>,
    debug_log: DebugLog,
    timeouts: RequestTimeouts,
    /// Last `tools/call` id handed out.
    last_request_id: AtomicU64,
}

impl McpClient {
    /// Create a client over an arbitrary transport.
    pub fn new(transport: Arc<dyn Transport>, debug_log: DebugLog) -> Self {
        Self {
            transport,
            debug_log,
            timeouts: RequestTimeouts::default(),
            last_request_id: AtomicU64::new(0),
        }
    }

    /// Create a client over HTTP.
    pub fn http(debug_log: DebugLog) -> Result<Self> {
        let transport = HttpTransport::new(debug_log.clone())?;
        Ok(Self::new(Arc::new(transport), debug_log))
    }

    /// Override the default request timeouts.
    pub fn with_timeouts(mut self, timeouts: RequestTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn timeouts(&self) -> RequestTimeouts {
        self.timeouts
    }

    pub fn debug_log(&self) -> &DebugLog {
        &self.debug_log
    }

    /// Next `tools/call` id: wall-clock millis, bumped to stay strictly increasing.
    fn next_request_id(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        match self
            .last_request_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            }) {
            Ok(last) | Err(last) => now.max(last + 1),
        }
    }

    /// Probe the server with `initialize`.
    ///
    /// Never fails: every outcome is folded into a [`ConnectionCheck`].
    pub async fn initialize(&self, url: &str) -> ConnectionCheck {
        self.debug_log.info(format!("Testing connection to: {}", url));

        let request = JsonRpcRequest::initialize();
        let body = match serde_json::to_value(&request) {
            Ok(body) => body,
            Err(e) => return self.probe_failed(e.to_string()),
        };

        let response = match self.transport.post(url, &body, self.timeouts.probe).await {
            Ok(response) => response,
            Err(e) => return self.probe_failed(e.to_string()),
        };

        if let Some(error) = response_error(&response) {
            self.debug_log.error(format!("Server error: {}", error));
            let message = match error.get("message").filter(|m| !m.is_null()) {
                Some(Value::String(text)) => text.clone(),
                Some(other) => other.to_string(),
                None => "Unknown error".to_string(),
            };
            tracing::warn!(url = %url, error = %message, "initialize returned an error");
            return ConnectionCheck::failed(format!("Server error: {}", message));
        }

        if let Some(result) = response_result(&response) {
            let init = InitializeResult::from_result(result);
            let name = init.server_name();
            self.debug_log.success(format!("Connection successful! Server: {}", name));
            tracing::info!(url = %url, server = %name, "connected to tool server");
            return ConnectionCheck::ok(format!("Connected to {}", name));
        }

        self.debug_log.error("Unexpected response format: neither result nor error");
        ConnectionCheck::failed("Unexpected response format")
    }

    fn probe_failed(&self, message: String) -> ConnectionCheck {
        self.debug_log.error(format!("Connection failed: {}", message));
        tracing::warn!(error = %message, "connection test failed");
        ConnectionCheck::failed(message)
    }

    /// Invoke a tool with `tools/call` and return the raw `result`.
    ///
    /// All failures come back as [`McpError::RemoteTool`] with a message fit
    /// for display.
    pub async fn call_tool(&self, url: &str, name: &str, arguments: Value) -> Result<Value> {
        let params = CallToolParams {
            name: name.to_string(),
            arguments,
        };
        let request = JsonRpcRequest::call_tool(self.next_request_id(), &params)?;
        let body = serde_json::to_value(&request)?;

        self.debug_log.info(format!("Calling tool: {}", name));

        let response = self
            .transport
            .post(url, &body, self.timeouts.tool_call)
            .await
            .map_err(normalize_transport_error)?;

        if let Some(error) = response_error(&response) {
            let message = error_message(error)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            self.debug_log.error(format!("Tool {} returned an error: {}", name, message));
            tracing::warn!(tool = %name, error = %message, "tool call returned error");
            return Err(McpError::remote_tool(message));
        }

        tracing::debug!(tool = %name, id = request.id, "tool call succeeded");
        Ok(response_result(&response).cloned().unwrap_or(Value::Null))
    }
}

/// Map a transport failure to the message a user sees.
fn normalize_transport_error(err: TransportError) -> McpError {
    let message = match &err {
        TransportError::Timeout(_) => TIMEOUT_MESSAGE.to_string(),
        TransportError::Connection(_) => CONNECTION_MESSAGE.to_string(),
        other => format!("Error: {}", other),
    };
    McpError::remote_tool(message)
}

/// Extract the reply text (`content[0].text`) from a `tools/call` result.
pub fn reply_text(result: Value) -> Result<String> {
    let parsed: CallToolResult = serde_json::from_value(result)
        .map_err(|e| McpError::malformed(format!("unexpected tool result: {}", e)))?;

    parsed
        .first_text()
        .map(str::to_string)
        .ok_or_else(|| McpError::malformed("missing content[0].text"))
}
