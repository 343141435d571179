//! User-visible notifications raised by the editing session.

use serde::Serialize;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
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

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }
}

/// Sink for transient notifications (toasts in a UI shell, stderr in the CLI).
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Emits notifications as log events only.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            Level::Success => tracing::info!(message = %notification.message, "Notification"),
            Level::Error => tracing::warn!(message = %notification.message, "Notification"),
        }
    }
}

/// Keeps every notification in memory, in order.
#[derive(Debug, Default, Clone)]
pub struct NotificationLog {
    inner: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<Notification> {
        self.inner.lock().map(|log| log.clone()).unwrap_or_default()
    }

    /// Remove and return everything logged so far.
    pub fn drain(&self) -> Vec<Notification> {
        self.inner
            .lock()
            .map(|mut log| std::mem::take(&mut *log))
            .unwrap_or_default()
    }

    pub fn errors(&self) -> Vec<Notification> {
        self.snapshot()
            .into_iter()
            .filter(|n| n.level == Level::Error)
            .collect()
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        TracingNotifier.notify(notification.clone());
        if let Ok(mut log) = self.inner.lock() {
            log.push(notification);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_keeps_order_and_drains() {
        let log = NotificationLog::new();
        log.notify(Notification::error("fetch failed"));
        log.notify(Notification::success("saved"));

        assert_eq!(log.errors(), vec![Notification::error("fetch failed")]);
        assert_eq!(log.drain().len(), 2);
        assert!(log.snapshot().is_empty());
    }

    #[test]
    fn test_clones_share_storage() {
        let log = NotificationLog::new();
        let handle = log.clone();
        handle.notify(Notification::success("saved"));
        assert_eq!(log.snapshot(), vec![Notification::success("saved")]);
    }
}
