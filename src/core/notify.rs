use std::sync::{Mutex, PoisonError};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    /// Whether the notification should pop up immediately.
    pub display: bool,
}

/// Fire-and-forget sink for user-facing notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Keeps notifications around so they can be shown after a command finishes.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    pending: Mutex<Vec<Notification>>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for NotificationQueue {
    fn notify(&self, notification: Notification) {
        debug!(title = %notification.title, "Queued notification");
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_collects_and_drains() {
        let queue = NotificationQueue::new();
        assert!(queue.is_empty());

        queue.notify(Notification {
            title: "Title".to_string(),
            message: "Something failed".to_string(),
            display: false,
        });
        assert_eq!(queue.len(), 1);

        let drained = queue.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].message, "Something failed");
        assert!(queue.is_empty());
    }
}
