use crate::sequence::Sequence;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use taskload_core::{Action, KeyCode, KeyEvent, Level, Trial};
use taskload_timing::CancelToken;
use tracing::debug;

/// Engine lifecycle. `Idle -> Running -> {Completed, Stopped}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Running,
    Completed,
    Stopped,
}

impl EngineState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => EngineState::Idle,
            1 => EngineState::Running,
            2 => EngineState::Completed,
            _ => EngineState::Stopped,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            EngineState::Idle => 0,
            EngineState::Running => 1,
            EngineState::Completed => 2,
            EngineState::Stopped => 3,
        }
    }
}

/// State shared between the engine loop and the input deliverer.
///
/// No global lock: the cursor and flags are atomics, and correctness goes
/// through each trial's first-writer-wins lock.
pub(crate) struct ExperimentRun {
    pub(crate) level: Level,
    pub(crate) response_key: KeyCode,
    pub(crate) sequence: Sequence,
    pub(crate) trials: Vec<Trial>,
    pub(crate) current_step: AtomicUsize,
    /// Gates input eligibility; set once the loop begins its first trial.
    pub(crate) started: AtomicBool,
    state: AtomicU8,
    pub(crate) cancel: CancelToken,
}

impl ExperimentRun {
    pub(crate) fn new(level: Level, response_key: KeyCode, sequence: Sequence) -> Self {
        let trials = (0..sequence.len()).map(|_| Trial::new()).collect();
        Self {
            level,
            response_key,
            sequence,
            trials,
            current_step: AtomicUsize::new(0),
            started: AtomicBool::new(false),
            state: AtomicU8::new(EngineState::Idle.as_u8()),
            cancel: CancelToken::new(),
        }
    }

    pub(crate) fn state(&self) -> EngineState {
        EngineState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn set_state(&self, state: EngineState) {
        self.state.store(state.as_u8(), Ordering::Release);
    }
}

/// Cloneable handle for the host's input layer and for cancellation.
#[derive(Clone)]
pub struct RunHandle {
    run: Arc<ExperimentRun>,
}

impl RunHandle {
    pub(crate) fn new(run: Arc<ExperimentRun>) -> Self {
        Self { run }
    }

    /// Input-path grading. Invoked by the host whenever the participant
    /// presses a key; events outside an open response window are ignored.
    pub fn on_key_event(&self, event: KeyEvent) {
        let run = &self.run;
        if run.state() != EngineState::Running || !run.started.load(Ordering::Acquire) {
            return;
        }

        let step = run.current_step.load(Ordering::Acquire);
        let Some(trial) = run.trials.get(step) else {
            return;
        };
        if !trial.is_open() {
            debug!(step, "keypress outside the response window, ignored");
            return;
        }

        if event.code != run.response_key {
            trial.grade(false, None);
            return;
        }

        match run.level.expected_action(run.sequence.as_slice(), step) {
            Action::Respond => {
                let reaction = trial
                    .start_time()
                    .map(|onset| event.at.saturating_duration_since(onset));
                if trial.grade(true, reaction) {
                    debug!(step, ?reaction, "response graded correct");
                }
            }
            Action::Withhold => {
                trial.grade(false, None);
            }
        }
    }

    /// Requests cancellation. Safe from any thread; the loop exits at its
    /// next boundary check, never mid-trial.
    pub fn stop(&self) {
        self.run.cancel.cancel();
    }

    pub fn state(&self) -> EngineState {
        self.run.state()
    }
}
