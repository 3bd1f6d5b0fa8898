use super::{ConnectionState, NotificationClient, core::ClientInner};
use crate::infrastructure::{ReconnectTimer, ReconnectTimers};
use crate::messaging::MessageRouter;
use crate::notification::{NotificationCenter, NotificationSink};
use crate::store::{CredentialStore, PreferenceStore};
use crate::types::{
    DEFAULT_ENDPOINT, DEFAULT_MAILBOX_ROUTE, MAX_RECONNECT_ATTEMPTS, NOTIFICATION_TIMEOUT,
    NotifyError, RECONNECT_INTERVAL, Result,
};
use crate::websocket::validate_endpoint;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;

#[derive(Debug, Clone)]
pub struct NotificationClientOptions {
    /// Server base URL, `ws://` or `wss://`
    pub endpoint: String,
    pub max_reconnect_attempts: u32,
    /// Delay before each reconnect attempt (milliseconds)
    pub reconnect_interval: u64,
    /// Lifetime of an undismissed notification (milliseconds)
    pub notification_timeout: u64,
    /// Route opened when a notification body is clicked
    pub inbox_route: String,
}

impl Default for NotificationClientOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_reconnect_attempts: MAX_RECONNECT_ATTEMPTS,
            reconnect_interval: RECONNECT_INTERVAL,
            notification_timeout: NOTIFICATION_TIMEOUT,
            inbox_route: DEFAULT_MAILBOX_ROUTE.to_string(),
        }
    }
}

/// Builder for NotificationClient that handles initialization
pub struct NotificationClientBuilder {
    options: NotificationClientOptions,
    credentials: Arc<dyn CredentialStore>,
    preferences: Arc<dyn PreferenceStore>,
    sink: Arc<dyn NotificationSink>,
    runtime: Handle,
}

impl NotificationClientBuilder {
    /// Create a new builder. Must be called from within a Tokio runtime.
    pub fn new<C, P, S>(
        options: NotificationClientOptions,
        credentials: Arc<C>,
        preferences: Arc<P>,
        sink: Arc<S>,
    ) -> Result<Self>
    where
        C: CredentialStore + 'static,
        P: PreferenceStore + 'static,
        S: NotificationSink + 'static,
    {
        validate_endpoint(&options.endpoint)?;

        if options.reconnect_interval == 0 {
            return Err(NotifyError::Config(
                "reconnect_interval must be greater than zero".to_string(),
            ));
        }
        if options.notification_timeout == 0 {
            return Err(NotifyError::Config(
                "notification_timeout must be greater than zero".to_string(),
            ));
        }

        let runtime = Handle::try_current().map_err(|_| {
            NotifyError::Config(
                "notification client must be created inside a Tokio runtime".to_string(),
            )
        })?;

        Ok(Self {
            options,
            credentials,
            preferences,
            sink,
            runtime,
        })
    }

    /// Build the client. No connection is opened until `connect` or `start`.
    pub fn build(self) -> NotificationClient {
        let notifications = NotificationCenter::new(
            self.sink,
            Duration::from_millis(self.options.notification_timeout),
            self.options.inbox_route.as_str(),
        );
        let router = MessageRouter::new(Arc::clone(&self.preferences), notifications.clone());
        let retry = ReconnectTimer::new(
            self.options.max_reconnect_attempts,
            Duration::from_millis(self.options.reconnect_interval),
        );

        NotificationClient {
            inner: Arc::new(ClientInner {
                options: self.options,
                credentials: self.credentials,
                preferences: self.preferences,
                notifications,
                router,
                runtime: self.runtime,
                state: Mutex::new(ConnectionState::new(retry)),
                timers: Mutex::new(ReconnectTimers::new()),
            }),
        }
    }
}
