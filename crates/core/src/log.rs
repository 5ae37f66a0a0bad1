//! Activity log entries and the bounded replay buffer.
//!
//! Every log call in the process produces one [`LogEntry`]. Recent entries
//! are retained in a [`LogBuffer`] so that newly attached observers can be
//! brought up to date before receiving live events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Severity classifying a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{s}")
    }
}

/// A single activity log entry. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// The log message text.
    pub message: String,

    /// Severity of the entry.
    pub severity: Severity,

    /// When the log call occurred.
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    /// Create an entry stamped with the current time.
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            timestamp: Utc::now(),
        }
    }
}

/// Bounded FIFO buffer of recent log entries.
///
/// Capacity is self-enforcing: appending beyond capacity evicts the oldest
/// entry. There is no error path. Contents live only as long as the process.
#[derive(Debug)]
pub struct LogBuffer {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl LogBuffer {
    /// Default number of retained entries.
    pub const DEFAULT_CAPACITY: usize = 100;

    /// Create a buffer holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert at the tail, evicting from the head when full.
    pub fn append(&mut self, entry: LogEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Owned copy of the current contents, oldest first.
    ///
    /// Later mutations of the buffer do not affect the returned sequence.
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
