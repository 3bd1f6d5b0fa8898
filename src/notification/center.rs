use super::{ClickTarget, Notification, NotificationId, NotificationSink};
use crate::infrastructure::lock;
use crate::types::NOTIFICATION_CONTAINER_ID;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};
use tokio::task::JoinHandle;

/// Queue of transient notifications drawn into a single container.
///
/// Every shown notification is removed exactly once: by the dismiss control
/// or by its auto-dismiss timer, whichever comes first.
#[derive(Clone)]
pub struct NotificationCenter {
    sink: Arc<dyn NotificationSink>,
    timeout: Duration,
    inbox_route: Arc<str>,
    next_id: Arc<AtomicU64>,
    active: Arc<Mutex<HashMap<NotificationId, JoinHandle<()>>>>,
}

impl NotificationCenter {
    pub fn new(
        sink: Arc<dyn NotificationSink>,
        timeout: Duration,
        inbox_route: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            sink,
            timeout,
            inbox_route: inbox_route.into(),
            next_id: Arc::new(AtomicU64::new(1)),
            active: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Create the container unless it already exists
    pub fn ensure_container(&self) -> bool {
        let created = self.sink.ensure_container(NOTIFICATION_CONTAINER_ID);
        if created {
            tracing::debug!("Created notification container '{}'", NOTIFICATION_CONTAINER_ID);
        }
        created
    }

    /// Render a notification and arm its auto-dismiss timer.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn show(&self, title: impl Into<String>, body: impl Into<String>) -> NotificationId {
        self.ensure_container();

        let id = NotificationId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let notification = Notification {
            id,
            title: title.into(),
            body: body.into(),
            created_at: SystemTime::now(),
        };

        // Registered before rendering so the sink may dismiss from inside render
        {
            let mut active = lock(&self.active);
            let center = self.clone();
            let deadline = tokio::time::Instant::now() + self.timeout;
            let timer = tokio::spawn(async move {
                tokio::time::sleep_until(deadline).await;
                center.expire(id);
            });
            active.insert(id, timer);
        }

        tracing::debug!("Showing {} '{}'", id, notification.title);
        self.sink.render(&notification);
        id
    }

    /// Handle a click on a notification
    pub fn click(&self, id: NotificationId, target: ClickTarget) {
        match target {
            ClickTarget::DismissControl => {
                self.dismiss(id);
            }
            ClickTarget::Body => {
                if lock(&self.active).contains_key(&id) {
                    self.sink.navigate(&self.inbox_route);
                }
            }
        }
    }

    /// Remove a notification immediately. Returns `false` if it was already gone.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        let Some(timer) = lock(&self.active).remove(&id) else {
            return false;
        };
        timer.abort();
        self.sink.remove(id);
        tracing::debug!("Dismissed {}", id);
        true
    }

    /// Number of notifications still on screen
    pub fn active_count(&self) -> usize {
        lock(&self.active).len()
    }

    /// Remove every visible notification
    pub fn clear(&self) {
        let drained: Vec<_> = lock(&self.active).drain().collect();
        for (id, timer) in drained {
            timer.abort();
            self.sink.remove(id);
        }
    }

    fn expire(&self, id: NotificationId) {
        if lock(&self.active).remove(&id).is_some() {
            self.sink.remove(id);
            tracing::debug!("Expired {}", id);
        }
    }
}
