use super::connection::{ConnectionStatus, Transport};
use crate::infrastructure::ReconnectTimer;
use std::time::Duration;
use tokio::sync::watch;

/// A reconnect the client should schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectPlan {
    pub identity: String,
    /// Generation of the connection that closed; the plan is void once it changes
    pub generation: u64,
    pub attempt: u32,
    pub delay: Duration,
}

/// What to do after a transport closed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The close belongs to a superseded connection
    Stale,
    Reconnect(ReconnectPlan),
    /// Retry budget used up; stay disconnected until the next explicit connect
    Exhausted,
}

/// Consolidated mutable state for NotificationClient.
///
/// Every `connect`/`disconnect` bumps `generation`. Transport events and
/// reconnect timers carry the generation they were created for, and anything
/// older than the current one is ignored.
#[derive(Debug)]
pub struct ConnectionState {
    identity: Option<String>,
    transport: Option<Transport>,
    status: ConnectionStatus,
    retry: ReconnectTimer,
    generation: u64,
    listener_registered: bool,
    status_tx: watch::Sender<ConnectionStatus>,
}

impl ConnectionState {
    pub fn new(retry: ReconnectTimer) -> Self {
        let (status_tx, _) = watch::channel(ConnectionStatus::Disconnected);
        Self {
            identity: None,
            transport: None,
            status: ConnectionStatus::Disconnected,
            retry,
            generation: 0,
            listener_registered: false,
            status_tx,
        }
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn retry_count(&self) -> u32 {
        self.retry.attempts()
    }

    pub fn max_retries(&self) -> u32 {
        self.retry.max_attempts()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn has_transport(&self) -> bool {
        self.transport.is_some()
    }

    /// Receiver observing every status change
    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.status_tx.subscribe()
    }

    /// Start a new connection for `identity`.
    ///
    /// With `expected` set (a reconnect timer firing), nothing happens unless
    /// the generation is still the one the timer was armed for. Returns the new
    /// generation and the transport it replaces, which the caller must close.
    pub fn begin_connect(
        &mut self,
        identity: String,
        expected: Option<u64>,
    ) -> Option<(u64, Option<Transport>)> {
        if let Some(expected) = expected
            && expected != self.generation
        {
            return None;
        }

        let previous = self.transport.take();
        self.generation += 1;
        self.identity = Some(identity);
        self.set_status(ConnectionStatus::Connecting);
        Some((self.generation, previous))
    }

    /// Store the transport opened for the current generation
    pub fn attach_transport(&mut self, transport: Transport) {
        debug_assert_eq!(transport.generation(), self.generation);
        self.transport = Some(transport);
    }

    /// Transport handshake completed. Returns `false` for a stale generation.
    pub fn on_open(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.retry.reset();
        self.set_status(ConnectionStatus::Connected);
        true
    }

    pub fn on_error(&mut self, generation: u64) {
        if generation == self.generation {
            self.set_status(ConnectionStatus::Disconnected);
        }
    }

    pub fn on_close(&mut self, generation: u64) -> CloseOutcome {
        if generation != self.generation {
            return CloseOutcome::Stale;
        }

        self.transport = None;
        self.set_status(ConnectionStatus::Disconnected);

        let Some(identity) = self.identity.clone() else {
            return CloseOutcome::Stale;
        };

        match self.retry.next_delay() {
            Some(delay) => CloseOutcome::Reconnect(ReconnectPlan {
                identity,
                generation,
                attempt: self.retry.attempts(),
                delay,
            }),
            None => CloseOutcome::Exhausted,
        }
    }

    /// Explicit disconnect: forget the identity and invalidate pending events
    pub fn disconnect(&mut self) -> Option<Transport> {
        self.generation += 1;
        self.identity = None;
        self.set_status(ConnectionStatus::Disconnected);
        self.transport.take()
    }

    /// Mark the preference listener as registered. Returns `true` only the first time.
    pub fn register_listener(&mut self) -> bool {
        !std::mem::replace(&mut self.listener_registered, true)
    }

    fn set_status(&mut self, status: ConnectionStatus) {
        if self.status != status {
            tracing::debug!("Connection status {:?} -> {:?}", self.status, status);
        }
        self.status = status;
        self.status_tx.send_replace(status);
    }
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self::new(ReconnectTimer::default())
    }
}
