use serde::Serialize;
use std::fmt;
use taskload_core::TrialRecord;

/// Post-run debrief statistics over the graded trials.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub trials: usize,
    pub correct: usize,
    pub responses: usize,
    pub accuracy_pct: f64,
    pub response_rate_pct: f64,
    pub mean_reaction_ms: Option<f64>,
    pub min_reaction_ms: Option<u64>,
    pub max_reaction_ms: Option<u64>,
}

impl RunSummary {
    pub fn from_records(records: &[TrialRecord]) -> Self {
        let trials = records.len();
        let correct = records.iter().filter(|r| r.correct).count();
        let reactions: Vec<u64> = records.iter().filter_map(|r| r.reaction_ms).collect();
        let responses = reactions.len();

        let pct = |count: usize| {
            if trials == 0 {
                0.0
            } else {
                count as f64 / trials as f64 * 100.0
            }
        };

        let mean_reaction_ms = (!reactions.is_empty())
            .then(|| reactions.iter().sum::<u64>() as f64 / responses as f64);

        Self {
            trials,
            correct,
            responses,
            accuracy_pct: pct(correct),
            response_rate_pct: pct(responses),
            mean_reaction_ms,
            min_reaction_ms: reactions.iter().copied().min(),
            max_reaction_ms: reactions.iter().copied().max(),
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} trials, {} correct ({:.1}%), {} responses ({:.1}%)",
            self.trials, self.correct, self.accuracy_pct, self.responses, self.response_rate_pct
        )?;
        if let Some(mean) = self.mean_reaction_ms {
            write!(
                f,
                ", reaction mean {:.1} ms (min {} ms, max {} ms)",
                mean,
                self.min_reaction_ms.unwrap_or_default(),
                self.max_reaction_ms.unwrap_or_default()
            )?;
        }
        Ok(())
    }
}
