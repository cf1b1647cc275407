//! Progress events emitted by the orchestrators.
//!
//! Orchestrators never print. They report discrete events to a
//! [`ProgressSink`], and each presentation layer (terminal, JSON lines)
//! implements the sink.

use std::sync::Mutex;

use serde::Serialize;

/// An item tracked within a batch: an applicant, or a step of a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemLabel {
    pub key: String,
    pub label: String,
}

impl ItemLabel {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    BatchStarted {
        title: String,
        subtitle: String,
        items: Vec<ItemLabel>,
    },
    ItemStarted {
        key: String,
    },
    ItemSucceeded {
        key: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
    ItemFailed {
        key: String,
        error: String,
    },
    ItemSkipped {
        key: String,
        reason: String,
    },
    Notice {
        level: NoticeLevel,
        message: String,
    },
    BatchFinished {
        summary: BatchSummary,
    },
}

impl ProgressEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self::Notice {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::Notice {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Receiver for progress events. Check runs report from concurrent tasks, so
/// implementations must be shareable.
pub trait ProgressSink: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// Keeps every event in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().expect("progress mutex poisoned").clone()
    }

    /// Messages of all notices at `level`.
    pub fn notices(&self, level: NoticeLevel) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ProgressEvent::Notice { level: l, message } if l == level => Some(message),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for RecordingSink {
    fn report(&self, event: ProgressEvent) {
        self.events
            .lock()
            .expect("progress mutex poisoned")
            .push(event);
    }
}
