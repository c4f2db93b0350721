//! JSON-RPC 2.0 envelope and tool-call payload types.
//!
//! Response parsing is lenient: servers in the wild omit `type` on content
//! items, drop `serverInfo`, or return error objects without a `message`, and
//! none of those should turn into a parse failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC version string.
pub const JSONRPC_VERSION: &str = "2.0";

/// Request id used for every `initialize` probe.
pub const INITIALIZE_REQUEST_ID: u64 = 1;

/// Method names.
pub mod methods {
    pub const INITIALIZE: &str = "initialize";
    pub const TOOLS_CALL: &str = "tools/call";
}

// ─────────────────────────────────────────────────────────────────────────────
// Envelope
// ─────────────────────────────────────────────────────────────────────────────

/// A JSON-RPC request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Always "2.0".
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    /// Always present; `{}` when a method takes no parameters.
    pub params: Value,
}

impl JsonRpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params,
        }
    }

    /// The `initialize` probe request.
    pub fn initialize() -> Self {
        Self::new(
            INITIALIZE_REQUEST_ID,
            methods::INITIALIZE,
            Value::Object(Default::default()),
        )
    }

    /// A `tools/call` request.
    pub fn call_tool(id: u64, params: &CallToolParams) -> serde_json::Result<Self> {
        Ok(Self::new(id, methods::TOOLS_CALL, serde_json::to_value(params)?))
    }
}

/// The `error` member of a response, if present and non-null.
pub fn response_error(response: &Value) -> Option<&Value> {
    response.get("error").filter(|e| !e.is_null())
}

/// The `result` member of a response, if present.
pub fn response_result(response: &Value) -> Option<&Value> {
    response.get("result")
}

/// The human-readable message of a JSON-RPC error object.
pub fn error_message(error: &Value) -> Option<&str> {
    error.get("message").and_then(Value::as_str)
}

// ─────────────────────────────────────────────────────────────────────────────
// initialize
// ─────────────────────────────────────────────────────────────────────────────

/// Server info returned from `initialize`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Result of the `initialize` request. Only `serverInfo` is consumed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    #[serde(default)]
    pub server_info: Option<ServerInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_version: Option<String>,
}

impl InitializeResult {
    /// Parse leniently; anything unparseable reads as an empty result.
    pub fn from_result(result: &Value) -> Self {
        serde_json::from_value(result.clone()).unwrap_or_default()
    }

    /// The advertised server name, or `"Unknown"`.
    pub fn server_name(&self) -> &str {
        self.server_info
            .as_ref()
            .and_then(|info| info.name.as_deref())
            .unwrap_or("Unknown")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// tools/call
// ─────────────────────────────────────────────────────────────────────────────

/// Parameters for the `tools/call` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    pub arguments: Value,
}

/// A content item in a tool result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolContent {
    /// Content type, usually `"text"`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Result of the `tools/call` request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    pub content: Vec<ToolContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl CallToolResult {
    /// Text of the first content item.
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().and_then(|c| c.text.as_deref())
    }

    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_initialize_request_shape() {
        let req = JsonRpcRequest::initialize();
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}})
        );
    }

    #[test]
    fn test_call_tool_request_shape() {
        let params = CallToolParams {
            name: "chat".to_string(),
            arguments: json!({"message": "hi"}),
        };
        let req = JsonRpcRequest::call_tool(42, &params).unwrap();
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["method"], "tools/call");
        assert_eq!(value["id"], 42);
        assert_eq!(value["params"]["name"], "chat");
        assert_eq!(value["params"]["arguments"]["message"], "hi");
    }

    #[test]
    fn test_response_error_ignores_null() {
        let resp = json!({"jsonrpc": "2.0", "id": 1, "result": {}, "error": null});
        assert!(response_error(&resp).is_none());
        assert!(response_result(&resp).is_some());

        let resp = json!({"error": {"code": -32600, "message": "Invalid Request"}});
        let err = response_error(&resp).unwrap();
        assert_eq!(error_message(err), Some("Invalid Request"));
    }

    #[test]
    fn test_error_message_missing() {
        let err = json!({"code": 500});
        assert_eq!(error_message(&err), None);
    }

    #[test]
    fn test_server_name() {
        let result = json!({"serverInfo": {"name": "Fuse", "version": "1.0"}});
        assert_eq!(InitializeResult::from_result(&result).server_name(), "Fuse");

        let result = json!({"capabilities": {}});
        assert_eq!(InitializeResult::from_result(&result).server_name(), "Unknown");

        let result = json!("not an object");
        assert_eq!(InitializeResult::from_result(&result).server_name(), "Unknown");
    }

    #[test]
    fn test_call_tool_result_text() {
        let json = r#"{
            "content": [
                {"type": "text", "text": "Hello there"},
                {"type": "text", "text": "ignored"}
            ]
        }"#;
        let result: CallToolResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.first_text(), Some("Hello there"));
        assert!(!result.is_error());
    }

    #[test]
    fn test_call_tool_result_without_type() {
        let result: CallToolResult =
            serde_json::from_value(json!({"content": [{"text": "plain"}], "isError": true}))
                .unwrap();
        assert_eq!(result.first_text(), Some("plain"));
        assert!(result.is_error());
    }

    #[test]
    fn test_call_tool_result_empty_content() {
        let result: CallToolResult = serde_json::from_value(json!({"content": []})).unwrap();
        assert_eq!(result.first_text(), None);
    }
}
