use serde::{Deserialize, Serialize};

/// Persisted row for one graded trial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub step: usize,
    pub stimulus: u8,
    pub correct: bool,
    /// Reaction time in whole milliseconds; absent when the timeout path
    /// graded the trial.
    pub reaction_ms: Option<u64>,
}
