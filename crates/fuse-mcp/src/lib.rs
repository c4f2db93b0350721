//! JSON-RPC client for Fuse tool servers.
//!
//! Talks to a remote MCP-style server over HTTP POST, one request per call.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  McpClient                                                  │
//! │  - initialize (connectivity probe)                          │
//! │  - tools/call, error-message normalization                  │
//! └─────────────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Transport (HttpTransport)                                  │
//! │  - single POST, JSON body, per-call timeout                 │
//! │  - typed timeout / connection / protocol failures           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every request and response is recorded in the session's
//! [`DebugLog`](fuse_session::DebugLog).
//!
//! # Usage
//!
//! ```rust,ignore
//! use fuse_mcp::McpClient;
//! use fuse_session::DebugLog;
//! use serde_json::json;
//!
//! let client = McpClient::http(DebugLog::new())?;
//!
//! let check = client.initialize("https://tools.example.com/prod").await;
//! println!("{}", check.message);
//!
//! let result = client
//!     .call_tool("https://tools.example.com/prod", "chat", json!({"message": "hi"}))
//!     .await?;
//! println!("{}", fuse_mcp::reply_text(result)?);
//! ```

pub mod client;
pub mod error;
pub mod protocol;
pub mod transport;

pub use client::{ConnectionCheck, McpClient, RequestTimeouts, reply_text};
pub use error::{McpError, Result, TransportError};
pub use protocol::{
    CallToolParams, CallToolResult, InitializeResult, JsonRpcRequest, ServerInfo, ToolContent,
};
pub use transport::{HttpTransport, PROBE_TIMEOUT, TOOL_CALL_TIMEOUT, Transport};
