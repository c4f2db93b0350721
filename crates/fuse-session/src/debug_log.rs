//! Debug log shown in the client's diagnostics view.
//!
//! Transport and protocol code append here while a request is in flight, and
//! the display reads a snapshot of the newest entries at the same time, so the
//! store sits behind a shared mutex and every read clones out.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use chrono::Local;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::state::StateChange;

/// Maximum number of entries retained in the store.
pub const MAX_DEBUG_ENTRIES: usize = 500;

/// Number of entries the display view exposes.
pub const DISPLAY_DEBUG_ENTRIES: usize = 20;

/// Display format for debug entry times.
const DEBUG_TIME_FORMAT: &str = "%H:%M:%S";

/// Severity of a debug entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebugLevel {
    Info,
    Success,
    Error,
}

impl DebugLevel {
    /// Short marker used when printing the log.
    pub fn marker(&self) -> &'static str {
        match self {
            DebugLevel::Info => "INF",
            DebugLevel::Success => "OK ",
            DebugLevel::Error => "ERR",
        }
    }
}

impl fmt::Display for DebugLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DebugLevel::Info => "info",
            DebugLevel::Success => "success",
            DebugLevel::Error => "error",
        };
        f.write_str(s)
    }
}

/// A single debug log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugLogEntry {
    pub time: String,
    pub level: DebugLevel,
    pub message: String,
}

impl fmt::Display for DebugLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} {}", self.time, self.level.marker(), self.message)
    }
}

/// Shared, append-only debug log.
///
/// Clones share the same underlying store.
#[derive(Debug, Clone)]
pub struct DebugLog {
    entries: Arc<Mutex<VecDeque<DebugLogEntry>>>,
    notifier: Option<broadcast::Sender<StateChange>>,
}

impl Default for DebugLog {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugLog {
    /// Create an empty log with no change notifications.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(DISPLAY_DEBUG_ENTRIES))),
            notifier: None,
        }
    }

    /// Create an empty log that publishes appends and clears on `notifier`.
    pub(crate) fn with_notifier(notifier: broadcast::Sender<StateChange>) -> Self {
        Self {
            notifier: Some(notifier),
            ..Self::new()
        }
    }

    /// Append an entry stamped with the current local time.
    ///
    /// The entry is mirrored to `tracing` at a matching level.
    pub fn push(&self, level: DebugLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            DebugLevel::Error => tracing::warn!(target: "fuse::debug", "{}", message),
            DebugLevel::Success | DebugLevel::Info => {
                tracing::debug!(target: "fuse::debug", kind = %level, "{}", message)
            }
        }

        let entry = DebugLogEntry {
            time: Local::now().format(DEBUG_TIME_FORMAT).to_string(),
            level,
            message,
        };

        {
            let mut entries = self.entries.lock();
            if entries.len() >= MAX_DEBUG_ENTRIES {
                entries.pop_front();
            }
            entries.push_back(entry);
        }

        self.notify(StateChange::DebugLogAppended);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(DebugLevel::Info, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(DebugLevel::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(DebugLevel::Error, message);
    }

    /// The newest [`DISPLAY_DEBUG_ENTRIES`] entries, oldest first.
    pub fn recent(&self) -> Vec<DebugLogEntry> {
        self.last(DISPLAY_DEBUG_ENTRIES)
    }

    /// The newest `n` entries, oldest first.
    pub fn last(&self, n: usize) -> Vec<DebugLogEntry> {
        let entries = self.entries.lock();
        let skip = entries.len().saturating_sub(n);
        entries.iter().skip(skip).cloned().collect()
    }

    /// Every retained entry.
    pub fn entries(&self) -> Vec<DebugLogEntry> {
        self.entries.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
        self.notify(StateChange::DebugLogCleared);
    }

    fn notify(&self, change: StateChange) {
        if let Some(tx) = &self.notifier {
            // No receivers is fine.
            let _ = tx.send(change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_read() {
        let log = DebugLog::new();
        assert!(log.is_empty());

        log.info("Calling tool: chat");
        log.success("done");
        log.error("boom");

        assert_eq!(log.len(), 3);
        let entries = log.entries();
        assert_eq!(entries[0].level, DebugLevel::Info);
        assert_eq!(entries[1].level, DebugLevel::Success);
        assert_eq!(entries[2].message, "boom");
        assert_eq!(entries[0].time.len(), 8);
    }

    #[test]
    fn test_entry_display() {
        let entry = DebugLogEntry {
            time: "12:00:01".to_string(),
            level: DebugLevel::Error,
            message: "Request failed".to_string(),
        };
        assert_eq!(entry.to_string(), "[12:00:01] ERR Request failed");
    }

    #[test]
    fn test_recent_caps_at_display_size() {
        let log = DebugLog::new();
        for i in 0..45 {
            log.info(format!("entry {}", i));
        }

        let recent = log.recent();
        assert_eq!(recent.len(), DISPLAY_DEBUG_ENTRIES);
        assert_eq!(recent[0].message, "entry 25");
        assert_eq!(recent[19].message, "entry 44");
        assert_eq!(log.len(), 45);
    }

    #[test]
    fn test_recent_with_few_entries() {
        let log = DebugLog::new();
        log.info("only");
        assert_eq!(log.recent().len(), 1);
        assert!(log.last(0).is_empty());
    }

    #[test]
    fn test_store_is_bounded() {
        let log = DebugLog::new();
        for i in 0..(MAX_DEBUG_ENTRIES + 10) {
            log.info(format!("{}", i));
        }
        assert_eq!(log.len(), MAX_DEBUG_ENTRIES);
        assert_eq!(log.entries()[0].message, "10");
    }

    #[test]
    fn test_clones_share_store() {
        let log = DebugLog::new();
        let writer = log.clone();
        writer.info("from clone");
        assert_eq!(log.len(), 1);

        log.clear();
        assert!(writer.is_empty());
    }

    #[test]
    fn test_notifier_publishes() {
        let (tx, mut rx) = broadcast::channel(8);
        let log = DebugLog::with_notifier(tx);

        log.info("x");
        log.clear();

        assert_eq!(rx.try_recv().unwrap(), StateChange::DebugLogAppended);
        assert_eq!(rx.try_recv().unwrap(), StateChange::DebugLogCleared);
    }

    #[test]
    fn test_concurrent_append_and_snapshot() {
        let log = DebugLog::new();
        let writer = log.clone();

        let handle = std::thread::spawn(move || {
            for i in 0..200 {
                writer.info(format!("{}", i));
            }
        });

        for _ in 0..50 {
            assert!(log.recent().len() <= DISPLAY_DEBUG_ENTRIES);
        }
        handle.join().unwrap();
        assert_eq!(log.len(), 200);
    }
}
