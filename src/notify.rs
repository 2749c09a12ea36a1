//! User-facing notifications.
//!
//! The converter reports outcomes as one of three kinds of message. How (and for how
//! long) they are shown is up to whoever implements [NotificationSink].

use std::sync::{Mutex, PoisonError};
use tracing::{error, info, warn};

pub trait NotificationSink: Send + Sync {
    fn success(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
}

/// Reports notifications through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn success(&self, message: &str) {
        info!(target: "images_to_pdf::notify", "{message}");
    }

    fn warning(&self, message: &str) {
        warn!(target: "images_to_pdf::notify", "{message}");
    }

    fn error(&self, message: &str) {
        error!(target: "images_to_pdf::notify", "{message}");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Warning(String),
    Error(String),
}

/// Keeps every notification it receives, in order
#[derive(Debug, Default)]
pub struct MemorySink {
    received: Mutex<Vec<Notification>>,
}

impl MemorySink {
    pub fn new() -> MemorySink {
        MemorySink::default()
    }

    /// Everything received so far
    pub fn notifications(&self) -> Vec<Notification> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, notification: Notification) {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

impl NotificationSink for MemorySink {
    fn success(&self, message: &str) {
        self.push(Notification::Success(message.to_string()));
    }

    fn warning(&self, message: &str) {
        self.push(Notification::Warning(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.push(Notification::Error(message.to_string()));
    }
}
