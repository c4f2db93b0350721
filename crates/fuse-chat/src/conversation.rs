//! The conversation orchestrator.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use fuse_config::ChatSettings;
use fuse_mcp::{ConnectionCheck, HttpTransport, McpClient, RequestTimeouts, Transport, reply_text};
use fuse_session::{
    ConnectionStatus, DebugLogEntry, Message, SessionState, SharedSession, StateChange, shared,
};
use tokio::sync::broadcast;

use crate::error::{MISSING_URL_MESSAGE, MISSING_URL_PROBE_MESSAGE, TurnError};
use crate::tools::select_tool;

/// Appended to every error reply.
pub const ERROR_HINT: &str = "\n\nPlease check your server URL and API keys.";

/// How a turn resolved. Either way one assistant message was appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The server replied; carries the reply text.
    Replied(String),
    /// The call failed; carries the error message shown to the user.
    Failed(String),
}

impl TurnOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TurnOutcome::Replied(_))
    }

    /// Content of the assistant message that was appended.
    pub fn content(&self) -> &str {
        match self {
            TurnOutcome::Replied(text) | TurnOutcome::Failed(text) => text,
        }
    }
}

/// Marks a turn in flight; cleared on drop.
struct TurnGuard<'a>(&'a AtomicBool);

impl<'a> TurnGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives turns and connection tests against one session.
///
/// The session lock is only taken for individual mutations, never across the
/// network call, so [`Conversation::session`] can be read while a turn is
/// awaiting a reply.
pub struct Conversation {
    session: SharedSession,
    client: McpClient,
    in_flight: AtomicBool,
}

impl Conversation {
    /// Start a fresh session over `transport`.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let state = SessionState::new();
        let client = McpClient::new(transport, state.debug_log().clone());
        Self::from_parts(shared(state), client)
    }

    /// Start a fresh session over HTTP.
    pub fn http() -> fuse_mcp::Result<Self> {
        let state = SessionState::new();
        let transport = HttpTransport::new(state.debug_log().clone())?;
        let client = McpClient::new(Arc::new(transport), state.debug_log().clone());
        Ok(Self::from_parts(shared(state), client))
    }

    fn from_parts(session: SharedSession, client: McpClient) -> Self {
        Self {
            session,
            client,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_timeouts(mut self, timeouts: RequestTimeouts) -> Self {
        self.client = self.client.with_timeouts(timeouts);
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────

    /// Shared handle to the session state.
    pub fn session(&self) -> SharedSession {
        Arc::clone(&self.session)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateChange> {
        self.session.read().subscribe()
    }

    pub fn session_id(&self) -> String {
        self.session.read().session_id().to_string()
    }

    /// Snapshot of the transcript.
    pub fn messages(&self) -> Vec<Message> {
        self.session.read().messages().to_vec()
    }

    /// The message at `index`, as announced by [`StateChange::MessageAppended`].
    pub fn message(&self, index: usize) -> Option<Message> {
        self.session.read().messages().get(index).cloned()
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.session.read().connection_status()
    }

    pub fn recent_debug_logs(&self) -> Vec<DebugLogEntry> {
        self.session.read().recent_debug_logs()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Turns
    // ─────────────────────────────────────────────────────────────────────────

    /// Send one user message and record the reply.
    ///
    /// Returns `Err` only when the turn never started; every network or server
    /// failure resolves to [`TurnOutcome::Failed`] with an error message
    /// appended to the transcript.
    pub async fn submit(
        &self,
        input: &str,
        settings: &ChatSettings,
    ) -> Result<TurnOutcome, TurnError> {
        if !settings.has_server_url() {
            tracing::warn!("message submitted without a server URL");
            return Err(TurnError::validation(MISSING_URL_MESSAGE));
        }
        if input.trim().is_empty() {
            return Err(TurnError::EmptyInput);
        }

        let _guard = TurnGuard::acquire(&self.in_flight).ok_or(TurnError::Busy)?;

        let invocation = {
            let mut session = self.session.write();
            session.push_user(input);
            select_tool(input, session.session_id(), settings)
        };

        tracing::info!(
            tool = invocation.tool,
            provider = %settings.provider,
            "sending message"
        );

        let reply = self
            .client
            .call_tool(settings.server_url.trim(), invocation.tool, invocation.arguments)
            .await
            .and_then(reply_text);

        let outcome = match reply {
            Ok(text) => {
                self.session.write().push_assistant(text.as_str());
                TurnOutcome::Replied(text)
            }
            Err(err) => {
                let content = format!("Error: {}{}", err, ERROR_HINT);
                self.client
                    .debug_log()
                    .error(format!("Turn failed: {}", err));
                self.session.write().push_error(content.as_str());
                TurnOutcome::Failed(content)
            }
        };

        Ok(outcome)
    }

    /// Probe the server and record the resulting connection status.
    pub async fn test_connection(
        &self,
        settings: &ChatSettings,
    ) -> Result<ConnectionCheck, TurnError> {
        if !settings.has_server_url() {
            return Err(TurnError::validation(MISSING_URL_PROBE_MESSAGE));
        }

        let check = self.client.initialize(settings.server_url.trim()).await;
        let status = if check.connected {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Error
        };
        self.session.write().set_connection_status(status);

        Ok(check)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // User actions
    // ─────────────────────────────────────────────────────────────────────────

    /// Clear the transcript, keeping the session id.
    pub fn clear_chat(&self) {
        self.session.write().clear_messages();
    }

    /// Clear the transcript and start a new session id.
    pub fn new_session(&self) {
        self.session.write().reset_session();
    }

    pub fn clear_debug_logs(&self) {
        self.session.read().clear_debug_logs();
    }
}
