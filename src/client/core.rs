use super::{
    CloseOutcome, ConnectionState, ConnectionStatus, NotificationClientBuilder,
    NotificationClientOptions, ReconnectPlan, Transport,
};
use crate::infrastructure::{ReconnectTimers, lock};
use crate::messaging::MessageRouter;
use crate::notification::{NotificationCenter, NotificationSink};
use crate::store::{CredentialStore, PreferenceStore, parse_user_info};
use crate::types::{Result, storage_keys};
use crate::websocket::{WebSocketFactory, build_endpoint_url};
use futures::{SinkExt, StreamExt};
use std::sync::{Arc, Mutex, Weak};
use tokio::runtime::Handle;
use tokio::sync::{oneshot, watch};
use tokio_tungstenite::tungstenite::Message;
use url::Url;

pub(crate) struct ClientInner {
    pub(crate) options: NotificationClientOptions,
    pub(crate) credentials: Arc<dyn CredentialStore>,
    pub(crate) preferences: Arc<dyn PreferenceStore>,
    pub(crate) notifications: NotificationCenter,
    pub(crate) router: MessageRouter,
    pub(crate) runtime: Handle,
    pub(crate) state: Mutex<ConnectionState>,
    pub(crate) timers: Mutex<ReconnectTimers>,
}

/// Live new-mail notification channel for one signed-in user.
///
/// `NotificationClient` keeps at most one WebSocket open to
/// `<endpoint>/ws/mail/{identity}?token={token}`, reconnects a bounded number
/// of times at a fixed interval when the connection drops, and shows every
/// incoming push as a transient notification unless the user switched them
/// off in their settings.
///
/// `connect` and `disconnect` never fail: transport problems are logged and
/// left to the reconnect policy.
///
/// Background tasks only hold a weak reference to the client. Dropping the
/// last handle closes the channel and disarms any pending reconnect; call
/// [`shutdown`](Self::shutdown) to also clear visible notifications.
///
/// # Example
///
/// ```no_run
/// use mail_notify::{MemorySink, MemoryStore, NotificationClient, NotificationClientOptions};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = Arc::new(MemoryStore::new());
/// store.set("auth_token", "eyJhbGciOi...");
///
/// let client = NotificationClient::new(
///     NotificationClientOptions::default(),
///     Arc::clone(&store),
///     store,
///     Arc::new(MemorySink::new()),
/// )?;
///
/// client.connect("alice@example.com");
/// // ...
/// client.shutdown().await;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct NotificationClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl NotificationClient {
    /// Creates a new NotificationClient.
    ///
    /// This validates the options but does not connect. Must be called from
    /// within a Tokio runtime; the client spawns its transport and timer tasks
    /// on that runtime.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::UrlParse`](crate::types::NotifyError::UrlParse) or
    /// [`NotifyError::Config`](crate::types::NotifyError::Config) for an unusable
    /// endpoint or interval, or when no runtime is available.
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
        NotificationClientBuilder::new(options, credentials, preferences, sink)
            .map(|builder| builder.build())
    }

    /// Opens the notification channel for `identity`.
    ///
    /// Any existing transport is closed first, so two calls in a row leave a
    /// single transport bound to the second identity. Returns immediately;
    /// observe [`status_receiver`](Self::status_receiver) to learn when the
    /// connection is up. An empty identity is ignored.
    pub fn connect(&self, identity: impl Into<String>) {
        self.connect_with(identity.into(), None);
    }

    /// Closes the channel and forgets the identity. No reconnect follows.
    /// Safe to call when nothing is connected.
    pub fn disconnect(&self) {
        lock(&self.inner.timers).cancel_all();
        let transport = lock(&self.inner.state).disconnect();
        if let Some(transport) = transport {
            tracing::info!("Disconnecting notification channel");
            transport.close();
        }
    }

    /// Connects with the email of the stored user profile, if there is one.
    /// Returns whether a connection was started.
    pub fn start(&self) -> bool {
        let Some(raw) = self.inner.credentials.user_info() else {
            tracing::debug!("No stored user profile, notification channel stays closed");
            return false;
        };
        match parse_user_info(&raw) {
            Ok(user) => {
                self.connect(user.email);
                true
            }
            Err(e) => {
                tracing::warn!("Ignoring stored user profile: {}", e);
                false
            }
        }
    }

    /// Aborts pending timers, closes the channel and removes every visible
    /// notification.
    pub async fn shutdown(&self) {
        let timers = std::mem::take(&mut *lock(&self.inner.timers));
        timers.shutdown().await;
        self.disconnect();
        self.inner.notifications.clear();
        tracing::info!("Notification client shut down");
    }

    /// Create the notification container unless it already exists.
    /// Call this on navigation so alerts have somewhere to render.
    pub fn ensure_notification_container(&self) -> bool {
        self.inner.notifications.ensure_container()
    }

    /// Notification queue, for forwarding clicks from the rendering surface
    pub fn notifications(&self) -> &NotificationCenter {
        &self.inner.notifications
    }

    pub fn status(&self) -> ConnectionStatus {
        lock(&self.inner.state).status()
    }

    pub fn is_connected(&self) -> bool {
        self.status() == ConnectionStatus::Connected
    }

    /// Receiver that observes every connection status change
    pub fn status_receiver(&self) -> watch::Receiver<ConnectionStatus> {
        lock(&self.inner.state).subscribe()
    }

    /// Reconnect attempts made since the last successful open
    pub fn retry_count(&self) -> u32 {
        lock(&self.inner.state).retry_count()
    }

    /// Identity of the current or most recent connection
    pub fn identity(&self) -> Option<String> {
        lock(&self.inner.state).identity().map(str::to_string)
    }

    fn connect_with(&self, identity: String, expected: Option<u64>) {
        if identity.trim().is_empty() {
            tracing::warn!("Ignoring connect request with an empty identity");
            return;
        }

        let token = self.inner.credentials.auth_token();
        let url = match build_endpoint_url(&self.inner.options.endpoint, &identity, token.as_deref())
        {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Cannot build notification endpoint: {}", e);
                return;
            }
        };

        if expected.is_none() {
            lock(&self.inner.timers).cancel_all();
        }

        let (generation, previous, shutdown) = {
            let mut state = lock(&self.inner.state);
            let Some((generation, previous)) = state.begin_connect(identity.clone(), expected)
            else {
                tracing::debug!("Discarding stale reconnect timer");
                return;
            };
            let (shutdown_tx, shutdown_rx) = oneshot::channel();
            state.attach_transport(Transport::new(generation, shutdown_tx));
            (generation, previous, shutdown_rx)
        };

        if let Some(previous) = previous {
            tracing::debug!("Closing previous transport before reconnecting");
            previous.close();
        }

        self.register_preference_listener();

        tracing::info!("Connecting notification channel for {}", identity);
        self.inner.runtime.spawn(Self::run_transport(
            Arc::downgrade(&self.inner),
            generation,
            url,
            shutdown,
        ));

        self.inner.notifications.ensure_container();
    }

    fn register_preference_listener(&self) {
        if !lock(&self.inner.state).register_listener() {
            return;
        }

        let weak = Arc::downgrade(&self.inner);
        self.inner.preferences.subscribe(Arc::new(move |key: &str| {
            if key != storage_keys::MAIL_SETTINGS {
                return;
            }
            if let Some(client) = NotificationClient::from_weak(&weak) {
                client.on_preferences_changed();
            }
        }));
    }

    fn on_preferences_changed(&self) {
        let identity = lock(&self.inner.state).identity().map(str::to_string);
        match identity {
            Some(identity) => {
                tracing::info!("Notification settings changed, reconnecting");
                self.connect(identity);
            }
            None => tracing::debug!("Notification settings changed while disconnected"),
        }
    }

    fn from_weak(inner: &Weak<ClientInner>) -> Option<Self> {
        inner.upgrade().map(|inner| Self { inner })
    }

    /// Drives one transport until it closes, is torn down, or the client is dropped.
    async fn run_transport(
        inner: Weak<ClientInner>,
        generation: u64,
        url: Url,
        mut shutdown: oneshot::Receiver<()>,
    ) {
        let connected = tokio::select! {
            result = WebSocketFactory::create(&url) => result,
            _ = &mut shutdown => {
                tracing::debug!("Transport torn down before the handshake completed");
                return;
            }
        };

        let mut socket = match connected {
            Ok(socket) => socket,
            Err(e) => {
                tracing::error!("WebSocket error: {}", e);
                if let Some(client) = Self::from_weak(&inner) {
                    client.handle_error(generation);
                    client.handle_close(generation);
                }
                return;
            }
        };

        let opened = Self::from_weak(&inner).is_some_and(|client| client.handle_open(generation));
        if !opened {
            tracing::debug!("Discarding transport opened for a superseded connection");
            if let Err(e) = socket.close(None).await {
                tracing::debug!("Close handshake failed: {}", e);
            }
            return;
        }

        let (mut write, mut read) = socket.split();
        loop {
            tokio::select! {
                // Resolves on close() and when the client owning the sender is dropped
                _ = &mut shutdown => {
                    if let Err(e) = write.close().await {
                        tracing::debug!("Close handshake failed: {}", e);
                    }
                    break;
                }
                frame = read.next() => {
                    let Some(client) = Self::from_weak(&inner) else {
                        break;
                    };
                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            tracing::debug!("Received text message: {}", text.as_str());
                            client.inner.router.route(text.as_str());
                        }
                        Some(Ok(Message::Binary(data))) => {
                            tracing::warn!("Received binary message ({} bytes)", data.len());
                            client.inner.router.route(&String::from_utf8_lossy(&data));
                        }
                        Some(Ok(Message::Ping(data))) => {
                            tracing::debug!("Received ping ({} bytes)", data.len());
                        }
                        Some(Ok(Message::Pong(data))) => {
                            tracing::debug!("Received pong ({} bytes)", data.len());
                        }
                        Some(Ok(Message::Frame(_))) => {
                            tracing::debug!("Received raw frame (internal)");
                        }
                        Some(Ok(Message::Close(frame))) => {
                            match frame {
                                Some(close_frame) => tracing::info!(
                                    "Server closed connection: code={:?}, reason='{}'",
                                    close_frame.code,
                                    close_frame.reason.as_str()
                                ),
                                None => tracing::info!("Server closed connection without close frame"),
                            }
                            client.handle_close(generation);
                            break;
                        }
                        Some(Err(e)) => {
                            tracing::error!("WebSocket read error: {}", e);
                            client.handle_error(generation);
                            client.handle_close(generation);
                            break;
                        }
                        None => {
                            tracing::warn!("WebSocket stream ended");
                            client.handle_close(generation);
                            break;
                        }
                    }
                }
            }
        }
        tracing::debug!("Transport task for generation {} finished", generation);
    }

    fn handle_open(&self, generation: u64) -> bool {
        let opened = lock(&self.inner.state).on_open(generation);
        if opened {
            tracing::info!("Notification channel connected");
        }
        opened
    }

    fn handle_error(&self, generation: u64) {
        lock(&self.inner.state).on_error(generation);
    }

    fn handle_close(&self, generation: u64) {
        let (outcome, max_retries) = {
            let mut state = lock(&self.inner.state);
            (state.on_close(generation), state.max_retries())
        };

        match outcome {
            CloseOutcome::Stale => {
                tracing::debug!("Ignoring close of a superseded transport");
            }
            CloseOutcome::Reconnect(plan) => {
                tracing::info!(
                    "Attempting to reconnect ({}/{}) in {:?}...",
                    plan.attempt,
                    max_retries,
                    plan.delay
                );
                self.schedule_reconnect(plan);
            }
            CloseOutcome::Exhausted => {
                tracing::warn!(
                    "Giving up after {} reconnect attempts, staying disconnected",
                    max_retries
                );
            }
        }
    }

    fn schedule_reconnect(&self, plan: ReconnectPlan) {
        let weak = Arc::downgrade(&self.inner);
        let _guard = self.inner.runtime.enter();
        lock(&self.inner.timers).schedule(plan.delay, move || {
            if let Some(client) = NotificationClient::from_weak(&weak) {
                client.connect_with(plan.identity, Some(plan.generation));
            }
        });
    }
}
