//! Transient user-visible notices.
//!
//! Toast rendering is a presentation concern; the store only pushes messages
//! into this sink. The default implementation forwards to the log output.

use std::sync::Mutex;

use log::info;

/// Destination for transient, user-visible notices
pub trait NoticeSink: Send + Sync {
    fn push(&self, message: &str);
}

/// Default sink: forwards notices to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotices;

impl NoticeSink for LogNotices {
    fn push(&self, message: &str) {
        info!("notice: {message}");
    }
}

/// Collects notices in memory; used by tests
#[derive(Debug, Default)]
pub struct RecordedNotices {
    messages: Mutex<Vec<String>>,
}

impl RecordedNotices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything pushed so far, in order
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.messages.lock().unwrap().clear();
    }
}

impl NoticeSink for RecordedNotices {
    fn push(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
