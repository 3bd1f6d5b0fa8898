use crate::types::{MAX_RECONNECT_ATTEMPTS, RECONNECT_INTERVAL};
use std::time::Duration;

/// Reconnect schedule: a fixed delay, allowed a bounded number of times
#[derive(Debug, Clone)]
pub struct ReconnectTimer {
    attempts: u32,
    max_attempts: u32,
    interval: Duration,
}

impl ReconnectTimer {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            attempts: 0,
            max_attempts,
            interval,
        }
    }

    /// Consume one attempt and return the delay before it, or `None` once
    /// the attempts are exhausted
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempts >= self.max_attempts {
            return None;
        }

        self.attempts += 1;
        Some(self.interval)
    }

    /// Attempts consumed since the last reset
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Reset the timer
    pub fn reset(&mut self) {
        self.attempts = 0;
    }
}

impl Default for ReconnectTimer {
    fn default() -> Self {
        Self::new(
            MAX_RECONNECT_ATTEMPTS,
            Duration::from_millis(RECONNECT_INTERVAL),
        )
    }
}
