use std::time::Duration;
use tokio::task::JoinHandle;

/// Delayed callbacks owned by one client.
///
/// A fired or cancelled timer never runs its callback twice. Timers are
/// plain Tokio tasks, so scheduling needs a runtime context.
#[derive(Debug, Default)]
pub struct ReconnectTimers {
    armed: Vec<JoinHandle<()>>,
}

impl ReconnectTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `fire` once `delay` has elapsed, unless cancelled first
    pub fn schedule<F>(&mut self, delay: Duration, fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.armed.retain(|timer| !timer.is_finished());
        let deadline = tokio::time::Instant::now() + delay;
        self.armed.push(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            fire();
        }));
    }

    /// Timers that have neither fired nor been cancelled
    pub fn pending(&self) -> usize {
        self.armed.iter().filter(|timer| !timer.is_finished()).count()
    }

    /// Cancel every armed timer. Returns how many were still waiting.
    pub fn cancel_all(&mut self) -> usize {
        let mut cancelled = 0;
        for timer in self.armed.drain(..) {
            if !timer.is_finished() {
                cancelled += 1;
            }
            timer.abort();
        }
        if cancelled > 0 {
            tracing::debug!("Cancelled {} pending reconnect timer(s)", cancelled);
        }
        cancelled
    }

    /// Cancel every timer and wait until none of them can still fire
    pub async fn shutdown(mut self) {
        let armed = std::mem::take(&mut self.armed);
        for timer in &armed {
            timer.abort();
        }
        futures::future::join_all(armed).await;
    }
}
