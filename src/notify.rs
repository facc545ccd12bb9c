//! User-visible notifications (toasts) and the channel they are emitted through.
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::info;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AlertLevel {
    Success,
    Error,
    Info,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub level: AlertLevel,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn new(level: AlertLevel, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(AlertLevel::Success, title, description)
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(AlertLevel::Error, title, description)
    }
}

/// Fire-and-forget sink for notifications.
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

/// Recording sink, handy for headless use.
impl Notifier for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

/// Toast queue rendered by the UI; entries expire after a fixed time.
#[derive(Clone, Debug)]
pub struct NotificationCenter {
    entries: VecDeque<(Instant, Notification)>,
    ttl: Duration,
    capacity: usize,
}

impl NotificationCenter {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            ttl,
            capacity: capacity.max(1),
        }
    }

    pub fn push_at(&mut self, now: Instant, notification: Notification) {
        info!(
            level = ?notification.level,
            title = %notification.title,
            description = %notification.description,
            "notification"
        );
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back((now, notification));
    }

    /// Drop anything older than the time-to-live.
    pub fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.entries
            .retain(|(at, _)| now.saturating_duration_since(*at) < ttl);
    }

    /// Newest first.
    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter().rev().map(|(_, n)| n)
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.entries.back().map(|(_, n)| n)
    }

    pub fn dismiss_all(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(Duration::from_secs(6), 4)
    }
}

impl Notifier for NotificationCenter {
    fn notify(&mut self, notification: Notification) {
        self.push_at(Instant::now(), notification);
    }
}
