use crate::notification::{NotificationCenter, NotificationId};
use crate::store::{PreferenceStore, notifications_enabled};
use crate::types::MailPush;
use std::sync::Arc;

/// Turns incoming frames into notifications
#[derive(Clone)]
pub struct MessageRouter {
    preferences: Arc<dyn PreferenceStore>,
    notifications: NotificationCenter,
}

impl MessageRouter {
    pub fn new(preferences: Arc<dyn PreferenceStore>, notifications: NotificationCenter) -> Self {
        Self {
            preferences,
            notifications,
        }
    }

    /// Routes a raw frame to the notification center.
    ///
    /// Returns the id of the rendered notification, or `None` when the user
    /// has turned notifications off. The frame is consumed either way.
    pub fn route(&self, raw: &str) -> Option<NotificationId> {
        let push = MailPush::parse(raw);
        tracing::debug!(
            "Routing push: kind={}",
            push.kind()
                .map(|kind| kind.to_string())
                .unwrap_or_else(|| "<none>".to_string())
        );

        self.notifications.ensure_container();

        if !notifications_enabled(self.preferences.as_ref()) {
            tracing::info!("Notifications disabled, skipping display");
            return None;
        }

        Some(self.notifications.show(push.title(), push.body()))
    }
}
