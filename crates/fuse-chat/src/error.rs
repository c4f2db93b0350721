//! Turn rejection errors.

use thiserror::Error;

/// Shown when a message is submitted without a server URL.
pub const MISSING_URL_MESSAGE: &str = "Please configure your MCP Server URL first";

/// Shown when a connection test is requested without a server URL.
pub const MISSING_URL_PROBE_MESSAGE: &str = "Please enter a server URL first";

/// Why a turn was not started. Nothing is appended to the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnError {
    /// Configuration is incomplete.
    #[error("{0}")]
    Validation(String),

    #[error("message is empty")]
    EmptyInput,

    /// Another turn has not resolved yet.
    #[error("a message is already being sent")]
    Busy,
}

impl TurnError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
