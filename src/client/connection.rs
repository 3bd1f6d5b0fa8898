use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
}

/// Handle to the transport task of one connection attempt.
///
/// Closing (or dropping) the handle asks the task to send a close frame and
/// stop reading.
#[derive(Debug)]
pub struct Transport {
    generation: u64,
    shutdown: oneshot::Sender<()>,
}

impl Transport {
    pub(crate) fn new(generation: u64, shutdown: oneshot::Sender<()>) -> Self {
        Self {
            generation,
            shutdown,
        }
    }

    /// Connection generation this transport was opened for
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Tear the transport down
    pub fn close(self) {
        if self.shutdown.send(()).is_err() {
            tracing::debug!(
                "Transport for generation {} already finished",
                self.generation
            );
        }
    }
}
