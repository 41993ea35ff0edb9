//! Self-expiring queue of user-facing status messages.
//!
//! Each pushed notification gets its own timer task that reports the id
//! back once the TTL has elapsed. The owner calls
//! [`NotificationFeed::collect_expired`] from its loop to drop them.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Time-ordered unique notification id (UUID v7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(uuid::Uuid);

impl NotificationId {
    /// Creates a fresh id from the current time.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Unique id.
    pub id: NotificationId,
    /// Text shown to the user.
    pub message: String,
}

/// Ordered, timer-driven notification queue.
///
/// No cap and no deduplication. Dropping the feed aborts every pending
/// timer.
#[derive(Debug)]
pub struct NotificationFeed {
    entries: Vec<Notification>,
    timers: HashMap<NotificationId, JoinHandle<()>>,
    ttl: Duration,
    expired_tx: mpsc::UnboundedSender<NotificationId>,
    expired_rx: mpsc::UnboundedReceiver<NotificationId>,
}

impl NotificationFeed {
    /// Creates an empty feed whose notifications live for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let (expired_tx, expired_rx) = mpsc::unbounded_channel();
        Self {
            entries: Vec::new(),
            timers: HashMap::new(),
            ttl,
            expired_tx,
            expired_rx,
        }
    }

    /// Appends a notification and schedules its removal.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn push(&mut self, message: impl Into<String>) -> NotificationId {
        let id = NotificationId::new();
        let message = message.into();
        tracing::debug!(%id, %message, "notification");

        let tx = self.expired_tx.clone();
        let ttl = self.ttl;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let _ = tx.send(id);
        });

        self.entries.push(Notification { id, message });
        self.timers.insert(id, timer);
        id
    }

    /// Removes every notification whose timer has fired. Returns how many
    /// were removed.
    pub fn collect_expired(&mut self) -> usize {
        let mut removed = 0;
        while let Ok(id) = self.expired_rx.try_recv() {
            if self.expire(id) {
                removed += 1;
            }
        }
        removed
    }

    /// Removes one notification now and cancels its timer.
    pub fn expire(&mut self, id: NotificationId) -> bool {
        if let Some(timer) = self.timers.remove(&id) {
            timer.abort();
        }
        let before = self.entries.len();
        self.entries.retain(|n| n.id != id);
        self.entries.len() != before
    }

    /// Notifications in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[Notification] {
        &self.entries
    }

    /// Iterates notifications in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Notification> {
        self.entries.iter()
    }

    /// Number of live notifications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no notification is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Drop for NotificationFeed {
    fn drop(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.abort();
        }
    }
}
