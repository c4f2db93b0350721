//! Chat transcript messages.

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Display format for message timestamps (e.g. `03:07 PM`).
pub const MESSAGE_TIME_FORMAT: &str = "%I:%M %p";

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Label used when rendering the transcript.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Assistant",
        }
    }
}

/// A single entry in the transcript.
///
/// Messages are never edited after being appended to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Local wall-clock time the message was appended, already formatted.
    pub timestamp: String,
    #[serde(default)]
    pub is_error: bool,
}

impl Message {
    /// Create a message stamped with the current local time.
    pub fn new(role: Role, content: impl Into<String>, is_error: bool) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Local::now().format(MESSAGE_TIME_FORMAT).to_string(),
            is_error,
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}
