use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

/// Graded outcome of a trial.
///
/// `reaction` is `Some` only when the write that won the lock came from the
/// input path, and holds the elapsed time from stimulus onset to the press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub correct: bool,
    pub reaction: Option<Duration>,
}

/// Per-step response state, shared between the engine loop and the input
/// deliverer.
///
/// Correctness is assigned through `grade`, an atomic check-and-set: the
/// first caller wins and every later attempt is a silent no-op, no matter
/// how the timeout and input paths interleave.
#[derive(Debug, Default)]
pub struct Trial {
    started: AtomicBool,
    ended: AtomicBool,
    start: OnceLock<Instant>,
    outcome: OnceLock<Outcome>,
}

impl Trial {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the stimulus as about to display and pins its onset time.
    pub fn mark_started(&self, at: Instant) {
        let _ = self.start.set(at);
        self.started.store(true, Ordering::Release);
    }

    /// Closes the response window.
    pub fn mark_ended(&self) {
        self.ended.store(true, Ordering::Release);
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    pub fn is_ended(&self) -> bool {
        self.ended.load(Ordering::Acquire)
    }

    /// True while an input event is eligible to grade this trial.
    pub fn is_open(&self) -> bool {
        self.is_started() && !self.is_ended()
    }

    pub fn start_time(&self) -> Option<Instant> {
        self.start.get().copied()
    }

    /// Attempts to set correctness. Returns whether this call won the lock;
    /// a losing write is discarded without error.
    pub fn grade(&self, correct: bool, reaction: Option<Duration>) -> bool {
        self.outcome.set(Outcome { correct, reaction }).is_ok()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome.get().copied()
    }

    pub fn is_graded(&self) -> bool {
        self.outcome.get().is_some()
    }
}
