mod center;
mod sink;

pub use center::NotificationCenter;
pub use sink::{MemorySink, NotificationSink};

use std::time::SystemTime;

/// Identifier of a rendered notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(pub u64);

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "notification-{}", self.0)
    }
}

/// A transient alert shown to the user
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub body: String,
    pub created_at: SystemTime,
}

/// Where a click on a notification landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The explicit close control
    DismissControl,
    /// Anywhere else on the notification
    Body,
}
