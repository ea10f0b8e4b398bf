use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::Duration;

use taskload_core::{KeyCode, KeyEvent, Level};
use taskload_engine::{
    Engine, EngineState, NullDisplay, RunConfig, RunHandle, Sequence, StimulusDisplay,
};

fn fast_config(level: Level) -> RunConfig {
    let mut config = RunConfig::new("subject-1", level);
    config.pause_interval = Duration::from_millis(2);
    config.response_window = Duration::from_millis(40);
    config
}

/// Display that presses a key while chosen stimuli are on screen, and
/// optionally reports each shown step over a channel.
struct ScriptedDisplay {
    handle: Arc<OnceLock<RunHandle>>,
    respond_on: HashSet<usize>,
    key: KeyCode,
    shown: AtomicUsize,
    notify: Option<Sender<usize>>,
}

impl ScriptedDisplay {
    fn new(handle: Arc<OnceLock<RunHandle>>, respond_on: &[usize], key: KeyCode) -> Self {
        Self {
            handle,
            respond_on: respond_on.iter().copied().collect(),
            key,
            shown: AtomicUsize::new(0),
            notify: None,
        }
    }
}

impl StimulusDisplay for ScriptedDisplay {
    fn show_stimulus(&self, _value: u8) {
        let step = self.shown.fetch_add(1, Ordering::SeqCst);
        if let Some(notify) = &self.notify {
            let _ = notify.send(step);
        }
        if self.respond_on.contains(&step) {
            if let Some(handle) = self.handle.get() {
                handle.on_key_event(KeyEvent::new(self.key));
            }
        }
    }

    fn clear_screen(&self) {}
}

#[test]
fn easy_scenario_grades_per_press_pattern() {
    // Presses only at steps 0 and 3: step 1 is a correct withhold, step 2
    // is an incorrect withhold (stimulus is 5), steps 0 and 3 are hits.
    let slot = Arc::new(OnceLock::new());
    let display = ScriptedDisplay::new(Arc::clone(&slot), &[0, 3], KeyCode::Space);
    let engine = Engine::with_sequence(
        fast_config(Level::Easy),
        display,
        Sequence::new(vec![5, 3, 5, 5]),
    );
    let _ = slot.set(engine.handle());

    let report = engine.run();

    assert_eq!(report.state, EngineState::Completed);
    let correctness: Vec<bool> = report.records.iter().map(|r| r.correct).collect();
    assert_eq!(correctness, vec![true, true, false, true]);

    let reactions: Vec<bool> = report
        .records
        .iter()
        .map(|r| r.reaction_ms.is_some())
        .collect();
    assert_eq!(reactions, vec![true, false, false, true]);
    for record in &report.records {
        if let Some(ms) = record.reaction_ms {
            assert!(ms < 1_000, "implausible reaction time: {ms} ms");
        }
    }
}

#[test]
fn wrong_key_grades_an_expected_response_incorrect() {
    let slot = Arc::new(OnceLock::new());
    let display = ScriptedDisplay::new(Arc::clone(&slot), &[0], KeyCode::Char('x'));
    let engine =
        Engine::with_sequence(fast_config(Level::Easy), display, Sequence::new(vec![5]));
    let _ = slot.set(engine.handle());

    let report = engine.run();

    assert_eq!(report.records.len(), 1);
    assert!(!report.records[0].correct);
    assert_eq!(report.records[0].reaction_ms, None);
}

#[test]
fn medium_first_two_steps_grade_correct_without_a_response() {
    let slot = Arc::new(OnceLock::new());
    let display = ScriptedDisplay::new(Arc::clone(&slot), &[], KeyCode::Space);
    let engine = Engine::with_sequence(
        fast_config(Level::Medium),
        display,
        Sequence::new(vec![2, 4, 6]),
    );
    let _ = slot.set(engine.handle());

    let report = engine.run();

    let correctness: Vec<bool> = report.records.iter().map(|r| r.correct).collect();
    // Step 2 called for a response (three evens) that never came.
    assert_eq!(correctness, vec![true, true, false]);
    assert!(report.records.iter().all(|r| r.reaction_ms.is_none()));
}

#[test]
fn stop_mid_window_persists_only_completed_trials() {
    let slot = Arc::new(OnceLock::new());
    let mut display = ScriptedDisplay::new(Arc::clone(&slot), &[], KeyCode::Space);
    let (tx, rx) = mpsc::channel();
    display.notify = Some(tx);

    let mut config = fast_config(Level::Easy);
    config.response_window = Duration::from_millis(200);
    let engine = Engine::with_sequence(config, display, Sequence::new(vec![5, 3, 5, 5]));
    let handle = engine.handle();
    let _ = slot.set(handle.clone());

    let runner = thread::spawn(move || engine.run());

    // Let steps 0 and 1 play out, then stop while step 2's window is open.
    for expected in 0..=2 {
        assert_eq!(rx.recv().unwrap(), expected);
    }
    handle.stop();

    let report = runner.join().unwrap();
    assert_eq!(report.state, EngineState::Stopped);
    assert_eq!(report.records.len(), 3);
    let correctness: Vec<bool> = report.records.iter().map(|r| r.correct).collect();
    assert_eq!(correctness, vec![false, true, false]);

    // The run is over; late events are ignored without error.
    handle.on_key_event(KeyEvent::new(KeyCode::Space));
    assert_eq!(handle.state(), EngineState::Stopped);
}

#[test]
fn input_before_start_is_ignored() {
    let engine =
        Engine::with_sequence(fast_config(Level::Easy), NullDisplay, Sequence::new(vec![3]));
    let handle = engine.handle();

    assert_eq!(engine.state(), EngineState::Idle);
    handle.on_key_event(KeyEvent::new(KeyCode::Space));

    let report = engine.run();
    // The pre-run press graded nothing; the lone trial is a clean withhold.
    assert_eq!(report.records.len(), 1);
    assert!(report.records[0].correct);
    assert_eq!(report.records[0].reaction_ms, None);
}

#[test]
fn budget_expiry_completes_the_run_early() {
    let mut config = fast_config(Level::Easy);
    config.total_budget = Duration::from_millis(1);
    let engine =
        Engine::with_sequence(config, NullDisplay, Sequence::new(vec![1, 2, 3, 4, 5, 6]));

    let report = engine.run();

    // At most the trial already in flight when the budget ran out.
    assert_eq!(report.state, EngineState::Completed);
    assert!(report.records.len() <= 1);
}
