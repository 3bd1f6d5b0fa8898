use super::{Notification, NotificationId};
use crate::infrastructure::lock;
use std::sync::Mutex;

/// Rendering surface for notifications.
///
/// Implementations only draw; timing, dismissal and click handling live in
/// [`NotificationCenter`](super::NotificationCenter), which forwards user
/// interaction back through [`NotificationCenter::click`](super::NotificationCenter::click).
///
/// The center never holds its own locks while calling into the sink, so a
/// sink may call `click` or `dismiss` synchronously from any of these methods.
pub trait NotificationSink: Send + Sync {
    /// Make sure the container identified by `container_id` exists.
    /// Returns `true` if it had to be created.
    fn ensure_container(&self, container_id: &str) -> bool;

    /// Draw a notification inside the container
    fn render(&self, notification: &Notification);

    /// Remove a previously rendered notification
    fn remove(&self, id: NotificationId);

    /// Send the user to `route`
    fn navigate(&self, route: &str);
}

#[derive(Debug, Default)]
struct MemorySinkState {
    containers: Vec<String>,
    visible: Vec<Notification>,
    removed: Vec<NotificationId>,
    navigations: Vec<String>,
}

/// Headless sink that records what would have been drawn
#[derive(Debug, Default)]
pub struct MemorySink {
    state: Mutex<MemorySinkState>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn container_count(&self) -> usize {
        lock(&self.state).containers.len()
    }

    /// Notifications currently on screen, oldest first
    pub fn visible(&self) -> Vec<Notification> {
        lock(&self.state).visible.clone()
    }

    /// Ids in the order they were removed
    pub fn removed(&self) -> Vec<NotificationId> {
        lock(&self.state).removed.clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        lock(&self.state).navigations.clone()
    }
}

impl NotificationSink for MemorySink {
    fn ensure_container(&self, container_id: &str) -> bool {
        let mut state = lock(&self.state);
        if state.containers.iter().any(|id| id == container_id) {
            return false;
        }
        state.containers.push(container_id.to_string());
        true
    }

    fn render(&self, notification: &Notification) {
        lock(&self.state).visible.push(notification.clone());
    }

    fn remove(&self, id: NotificationId) {
        let mut state = lock(&self.state);
        state.visible.retain(|n| n.id != id);
        state.removed.push(id);
    }

    fn navigate(&self, route: &str) {
        lock(&self.state).navigations.push(route.to_string());
    }
}
