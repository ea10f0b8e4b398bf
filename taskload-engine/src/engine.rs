use crate::config::RunConfig;
use crate::display::StimulusDisplay;
use crate::run::{EngineState, ExperimentRun, RunHandle};
use crate::sequence::{Sequence, SequenceGenerator};
use rand::Rng;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;
use taskload_core::{Action, Level, TrialRecord};
use taskload_timing::precise_sleep;
use tracing::{debug, error, info};

/// Everything a run produced. The caller decides whether to persist it
/// (practice runs usually are not).
#[derive(Debug)]
pub struct RunReport {
    pub uid: String,
    pub level: Level,
    pub practice: bool,
    /// Terminal state, `Completed` or `Stopped`.
    pub state: EngineState,
    /// One record per graded trial, in step order. Trials the run never
    /// graded (stopped early) are omitted.
    pub records: Vec<TrialRecord>,
}

/// Drives the timed trial loop against an injected display.
///
/// The loop runs on the caller's thread; input events race it through
/// [`RunHandle::on_key_event`] from any other thread.
pub struct Engine<D: StimulusDisplay> {
    run: Arc<ExperimentRun>,
    display: D,
    config: RunConfig,
}

impl<D: StimulusDisplay> Engine<D> {
    /// Builds a run with a freshly generated sequence.
    pub fn new<R: Rng + ?Sized>(config: RunConfig, display: D, rng: &mut R) -> Self {
        let sequence = SequenceGenerator::new().generate(rng, config.sequence_length);
        Self::with_sequence(config, display, sequence)
    }

    /// Builds a run over a caller-supplied sequence.
    pub fn with_sequence(config: RunConfig, display: D, sequence: Sequence) -> Self {
        let run = Arc::new(ExperimentRun::new(
            config.level,
            config.response_key,
            sequence,
        ));
        Self {
            run,
            display,
            config,
        }
    }

    /// Handle for the host's input layer and for `stop()`.
    pub fn handle(&self) -> RunHandle {
        RunHandle::new(Arc::clone(&self.run))
    }

    pub fn state(&self) -> EngineState {
        self.run.state()
    }

    pub fn sequence(&self) -> &[u8] {
        self.run.sequence.as_slice()
    }

    /// Runs the experiment to completion, consuming the engine.
    ///
    /// Blocks for up to the total budget. Cancellation is observed at loop
    /// boundaries and mid-response-window; an in-flight trial always
    /// finishes grading before the loop exits.
    pub fn run(self) -> RunReport {
        let run = &self.run;
        run.set_state(EngineState::Running);
        info!(
            uid = %self.config.uid,
            level = %self.config.level,
            trials = run.sequence.len(),
            practice = self.config.practice,
            "starting experiment"
        );

        let deadline = Instant::now() + self.config.total_budget;

        let final_state = loop {
            if run.cancel.is_cancelled() {
                break EngineState::Stopped;
            }
            if Instant::now() >= deadline {
                break EngineState::Completed;
            }
            let step = run.current_step.load(Ordering::Acquire);
            if step >= run.sequence.len() {
                break EngineState::Completed;
            }
            let Some(trial) = run.trials.get(step) else {
                // Trials are allocated one per sequence position, so this
                // is a construction bug, not a recoverable condition.
                error!(step, "no trial allocated for step, aborting run");
                break EngineState::Stopped;
            };

            self.display.clear_screen();
            run.started.store(true, Ordering::Release);
            precise_sleep(self.config.pause_interval);

            trial.mark_started(Instant::now());
            self.display.show_stimulus(run.sequence[step]);
            debug!(step, stimulus = run.sequence[step], "stimulus shown");

            run.cancel.wait_for(self.config.response_window);
            trial.mark_ended();

            if !trial.is_graded() {
                let withheld_correctly = run.level.expected_action(run.sequence.as_slice(), step)
                    == Action::Withhold;
                // The lock discards this write if a keypress got there first.
                trial.grade(withheld_correctly, None);
            }

            run.current_step.fetch_add(1, Ordering::AcqRel);
        };

        run.set_state(final_state);
        let report = self.into_report(final_state);
        info!(
            state = ?final_state,
            graded = report.records.len(),
            "experiment finished"
        );
        report
    }

    fn into_report(self, state: EngineState) -> RunReport {
        let records = self
            .run
            .trials
            .iter()
            .enumerate()
            .filter_map(|(step, trial)| {
                trial.outcome().map(|outcome| TrialRecord {
                    step,
                    stimulus: self.run.sequence[step],
                    correct: outcome.correct,
                    reaction_ms: outcome.reaction.map(|d| d.as_millis() as u64),
                })
            })
            .collect();

        RunReport {
            uid: self.config.uid,
            level: self.config.level,
            practice: self.config.practice,
            state,
            records,
        }
    }
}
