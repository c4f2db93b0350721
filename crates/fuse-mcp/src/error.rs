//! Error types for transport and tool-call operations.

use std::time::Duration;

use thiserror::Error;

/// Result type for tool-call operations.
pub type Result<T> = std::result::Result<T, McpError>;

/// A failed HTTP exchange.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// No response within the request timeout.
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Connection refused, host unreachable or DNS failure.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The response body was not JSON.
    #[error("invalid JSON response: {0}")]
    Protocol(String),

    /// Any other transport fault.
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Classify a `reqwest` failure.
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else if err.is_connect() {
            Self::Connection(describe(&err))
        } else {
            Self::Other(describe(&err))
        }
    }
}

/// Render an error together with its source chain.
fn describe(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

/// Error type for tool-call operations.
#[derive(Debug, Error)]
pub enum McpError {
    /// The tool call failed; the message is ready to show to a user.
    #[error("{0}")]
    RemoteTool(String),

    /// A success envelope without the expected reply content.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Unnormalized transport failure.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl McpError {
    pub fn remote_tool(msg: impl Into<String>) -> Self {
        Self::RemoteTool(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }
}
