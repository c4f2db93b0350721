//! Session state for the Fuse chat client.
//!
//! Holds everything a conversation needs between turns:
//!
//! - the session id sent to the server in memory mode
//! - the ordered message transcript
//! - the result of the last connection test
//! - a bounded debug log of transport and protocol activity
//!
//! Nothing here performs I/O. Mutations go through [`SessionState`] methods and
//! each one publishes a [`StateChange`] so a display can redraw only what
//! changed.
//!
//! # Usage
//!
//! ```rust
//! use fuse_session::{Role, SessionState};
//!
//! let mut state = SessionState::new();
//! let mut changes = state.subscribe();
//!
//! state.push_user("hello");
//! assert_eq!(state.messages()[0].role, Role::User);
//! assert!(changes.try_recv().is_ok());
//! ```

pub mod debug_log;
pub mod message;
pub mod state;

pub use debug_log::{DISPLAY_DEBUG_ENTRIES, DebugLevel, DebugLog, DebugLogEntry, MAX_DEBUG_ENTRIES};
pub use message::{Message, Role};
pub use state::{ConnectionStatus, SessionState, SharedSession, StateChange, new_session_id, shared};
