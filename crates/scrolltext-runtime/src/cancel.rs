#![forbid(unsafe_code)]

//! Cooperative cancellation for the producer thread.

use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

/// Shared stop flag. Clones observe the same flag.
///
/// The producer polls [`is_cancelled`](Self::is_cancelled) once per
/// iteration and sleeps with [`wait_timeout`](Self::wait_timeout), which
/// returns early when the token is cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation and wake any waiter. Idempotent.
    pub fn cancel(&self) {
        let (flag, cvar) = &*self.inner;
        // A poisoned flag is still a valid bool.
        let mut cancelled = flag.lock().unwrap_or_else(|e| e.into_inner());
        *cancelled = true;
        cvar.notify_all();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        let (flag, _) = &*self.inner;
        *flag.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Sleep for up to `timeout`. Returns `true` if the token is cancelled.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (flag, cvar) = &*self.inner;
        let guard = flag.lock().unwrap_or_else(|e| e.into_inner());
        let (guard, _) = cvar
            .wait_timeout_while(guard, timeout, |cancelled| !*cancelled)
            .unwrap_or_else(|e| e.into_inner());
        *guard
    }
}
