// Infrastructure module - Background tasks, timers and locking helpers
pub mod timer;
pub mod timers;

pub use timer::ReconnectTimer;
pub use timers::ReconnectTimers;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a mutex, recovering the guard if a previous holder panicked
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
