//! Conversation orchestration for the Fuse chat client.
//!
//! A [`Conversation`] turns user input into one `tools/call` against the
//! configured server and records the outcome in the session:
//!
//! ```text
//! Idle ──input──▶ Validating ──ok──▶ Sending ──▶ Awaiting ──▶ Resolved ──▶ Idle
//!                     │                 (user msg      (network)   (assistant msg,
//!                     └─ no URL ─▶ Idle   appended)                 reply or error)
//! ```
//!
//! Network, protocol and server failures never escape a turn: they become an
//! assistant message flagged as an error. Only local problems (no server URL,
//! empty input, a turn already in flight) are returned as [`TurnError`].

pub mod conversation;
pub mod error;
pub mod tools;

pub use conversation::{Conversation, ERROR_HINT, TurnOutcome};
pub use error::{MISSING_URL_MESSAGE, MISSING_URL_PROBE_MESSAGE, TurnError};
pub use tools::{CHAT_TOOL, MEMORY_TOOL, ToolInvocation, select_tool};
