use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

/// How a bounded wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Elapsed,
    Cancelled,
}

/// Cooperative cancellation shared between threads.
///
/// `wait_for` is a deadline wait on a condvar, so a `cancel` fired from any
/// thread wakes a mid-window waiter immediately instead of being noticed
/// only after the full interval.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    cancelled: Mutex<bool>,
    condvar: Condvar,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Safe from any thread, idempotent.
    pub fn cancel(&self) {
        let mut cancelled = self.inner.cancelled.lock().unwrap();
        *cancelled = true;
        self.inner.condvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.cancelled.lock().unwrap()
    }

    /// Blocks until `timeout` elapses or the token is cancelled, whichever
    /// comes first.
    pub fn wait_for(&self, timeout: Duration) -> WaitOutcome {
        let deadline = Instant::now() + timeout;
        let mut cancelled = self.inner.cancelled.lock().unwrap();
        while !*cancelled {
            let now = Instant::now();
            if now >= deadline {
                return WaitOutcome::Elapsed;
            }
            let (guard, _timeout_result) = self
                .inner
                .condvar
                .wait_timeout(cancelled, deadline - now)
                .unwrap();
            cancelled = guard;
        }
        WaitOutcome::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn wait_elapses_when_not_cancelled() {
        let token = CancelToken::new();
        let started = Instant::now();
        let outcome = token.wait_for(Duration::from_millis(30));
        assert_eq!(outcome, WaitOutcome::Elapsed);
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn cancel_wakes_a_waiter_early() {
        let token = CancelToken::new();
        let waiter = token.clone();
        let handle = thread::spawn(move || {
            let started = Instant::now();
            let outcome = waiter.wait_for(Duration::from_secs(10));
            (outcome, started.elapsed())
        });

        thread::sleep(Duration::from_millis(20));
        token.cancel();

        let (outcome, waited) = handle.join().unwrap();
        assert_eq!(outcome, WaitOutcome::Cancelled);
        assert!(waited < Duration::from_secs(10));
    }

    #[test]
    fn wait_after_cancel_returns_immediately() {
        let token = CancelToken::new();
        token.cancel();
        assert!(token.is_cancelled());
        assert_eq!(
            token.wait_for(Duration::from_secs(10)),
            WaitOutcome::Cancelled
        );
    }
}
