use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

/// Transient message for the user (a toast in a GUI, a status line in the TUI).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

/// Sink for notices raised by the todo manager. Rendering layers implement this.
pub trait Notifier {
    fn notify(&self, notice: Notice);
}

/// Drops every notice. Handy for batch tooling that only cares about return values.
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _notice: Notice) {}
}

/// Keeps every notice in order; clones share the same log.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    log: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all notices received so far.
    pub fn notices(&self) -> Vec<Notice> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    /// Most recent notice, if any.
    pub fn last(&self) -> Option<Notice> {
        self.log.lock().ok().and_then(|log| log.last().cloned())
    }

    /// Remove and return everything received so far.
    pub fn drain(&self) -> Vec<Notice> {
        self.log
            .lock()
            .map(|mut log| std::mem::take(&mut *log))
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut log) = self.log.lock() {
            log.push(notice);
        }
    }
}
