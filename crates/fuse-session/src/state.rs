//! The session state object and its change notifications.

use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::debug_log::{DebugLevel, DebugLog, DebugLogEntry};
use crate::message::{Message, Role};

/// Capacity of the change notification channel.
const CHANGE_CHANNEL_CAPACITY: usize = 256;

/// Result of the most recent connection test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Unknown,
    Connected,
    Error,
}

impl ConnectionStatus {
    /// Human-readable label for status displays.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Unknown => "Not Tested",
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Error => "Connection Failed",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A mutation applied to a [`SessionState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    /// A message was appended at `index`.
    MessageAppended { index: usize },
    MessagesCleared,
    /// Messages were cleared and a new id assigned.
    SessionReset { session_id: String },
    ConnectionStatusChanged(ConnectionStatus),
    DebugLogAppended,
    DebugLogCleared,
}

/// Session state shared between the orchestrator and a display.
///
/// Holders must not keep the lock across an `.await`.
pub type SharedSession = Arc<RwLock<SessionState>>;

/// Wrap a state object for sharing.
pub fn shared(state: SessionState) -> SharedSession {
    Arc::new(RwLock::new(state))
}

/// Generate a fresh session id (`session-<unix-millis>-<8 hex>`).
pub fn new_session_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("session-{}-{}", millis, &suffix[..8])
}

/// In-memory state of one conversation.
#[derive(Debug)]
pub struct SessionState {
    session_id: String,
    messages: Vec<Message>,
    connection_status: ConnectionStatus,
    debug_log: DebugLog,
    changes: broadcast::Sender<StateChange>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Start a new session with a fresh id.
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        let debug_log = DebugLog::with_notifier(changes.clone());
        let session_id = new_session_id();

        tracing::debug!(session_id = %session_id, "created session");

        Self {
            session_id,
            messages: Vec::new(),
            connection_status: ConnectionStatus::default(),
            debug_log,
            changes,
        }
    }

    /// Receive every subsequent [`StateChange`].
    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.changes.subscribe()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Abbreviated id for status displays (`...` + last 8 characters).
    pub fn short_session_id(&self) -> String {
        let tail_start = self
            .session_id
            .char_indices()
            .rev()
            .nth(7)
            .map(|(i, _)| i)
            .unwrap_or(0);
        format!("...{}", &self.session_id[tail_start..])
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.connection_status
    }

    /// Handle to the debug log; clones share the store.
    pub fn debug_log(&self) -> &DebugLog {
        &self.debug_log
    }

    /// The entries a debug view should show.
    pub fn recent_debug_logs(&self) -> Vec<DebugLogEntry> {
        self.debug_log.recent()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    pub fn append_message(&mut self, role: Role, content: impl Into<String>, is_error: bool) {
        self.messages.push(Message::new(role, content, is_error));
        let index = self.messages.len() - 1;
        self.notify(StateChange::MessageAppended { index });
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.append_message(Role::User, content, false);
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.append_message(Role::Assistant, content, false);
    }

    /// Append an assistant message flagged as an error.
    pub fn push_error(&mut self, content: impl Into<String>) {
        self.append_message(Role::Assistant, content, true);
    }

    /// Empty the transcript, keeping the session id.
    pub fn clear_messages(&mut self) {
        self.messages.clear();
        self.notify(StateChange::MessagesCleared);
    }

    /// Empty the transcript and assign a new session id.
    pub fn reset_session(&mut self) {
        let mut session_id = new_session_id();
        while session_id == self.session_id {
            session_id = new_session_id();
        }

        tracing::info!(old = %self.session_id, new = %session_id, "session reset");

        self.session_id = session_id.clone();
        self.messages.clear();
        self.notify(StateChange::SessionReset { session_id });
    }

    pub fn set_connection_status(&mut self, status: ConnectionStatus) {
        self.connection_status = status;
        self.notify(StateChange::ConnectionStatusChanged(status));
    }

    pub fn append_debug_log(&self, level: DebugLevel, message: impl Into<String>) {
        self.debug_log.push(level, message);
    }

    pub fn clear_debug_logs(&self) {
        self.debug_log.clear();
    }

    fn notify(&self, change: StateChange) {
        // No receivers is fine.
        let _ = self.changes.send(change);
    }
}
