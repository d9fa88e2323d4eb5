//! User-facing notifications (the toast layer)
//!
//! Pages never let a failed call escape; they turn it into one
//! [`Notification`] and hand it to whatever [`Notifier`] the front-end
//! installed: stderr for one-shot commands, the status bar for the browser,
//! a [`NotificationLog`] in tests.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::error::FetchError;

/// Prefix of every failed-fetch notification.
pub const FETCH_FAILED: &str = "An error occurred, could not get";
/// Message for failed submissions (job posting, profile update, signup).
pub const SUBMIT_FAILED: &str = "An error occurred Please check your network and try again";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }
}

/// Sink for notifications. Implementations must not block.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl Notifier for mpsc::UnboundedSender<Notification> {
    fn notify(&self, notification: Notification) {
        // receiver gone means the view is closing; nothing left to show it on
        let _ = self.send(notification);
    }
}

/// Drops everything. Used when output must stay machine readable.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Notifier for Silent {
    fn notify(&self, notification: Notification) {
        tracing::debug!(message = %notification.message, "notification suppressed");
    }
}

/// Keeps every notification in memory.
#[derive(Debug, Default, Clone)]
pub struct NotificationLog {
    entries: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|n| n.level == Level::Error)
            .map(|n| n.message)
            .collect()
    }

    pub fn last(&self) -> Option<Notification> {
        self.entries().pop()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(notification);
    }
}

/// How much of the failure cause ends up in the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Detail {
    /// Same text for all three causes.
    Uniform,
    /// Append the cause (status code, no response, not sent).
    #[default]
    Detailed,
}

/// Message for a failed fetch of `subject` ("jobs", "dashboard", ...).
pub fn fetch_failed(subject: &str, cause: &FetchError, detail: Detail) -> String {
    let base = format!("{} {}", FETCH_FAILED, subject);
    if detail == Detail::Uniform {
        return base;
    }
    match cause {
        FetchError::Response { status, .. } => format!("{} (server responded with {})", base, status),
        FetchError::NoResponse { .. } => format!("{} (no response from server)", base),
        FetchError::RequestSetup { .. } => format!("{} (request could not be sent)", base),
    }
}
