use chrono::{DateTime, FixedOffset, Utc};
use std::fs;
use std::path::PathBuf;
use taskload_core::TrialRecord;
use thiserror::Error;
use tracing::info;

pub const CSV_HEADERS: [&str; 4] = ["Task", "Number", "Correctness", "Reaction Time"];

const FILE_STAMP: &str = "%Y_%m_%d_%H_%M";
const HEADER_STAMP: &str = "%a %b %e %H:%M:%S %Y";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write results to {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Serializes a run's graded trials to `<uid>_<yyyy_MM_dd_HH_mm>.csv`.
///
/// Stamps are rendered in a fixed UTC-8 zone so files sort the same no
/// matter where the experiment machine sits. Defaults to the platform temp
/// directory.
#[derive(Debug, Clone)]
pub struct ResultWriter {
    out_dir: PathBuf,
    zone: FixedOffset,
}

impl Default for ResultWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultWriter {
    pub fn new() -> Self {
        Self::with_dir(std::env::temp_dir())
    }

    pub fn with_dir(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            zone: FixedOffset::west_opt(8 * 3600).expect("static UTC-8 offset"),
        }
    }

    /// Writes the persisted record: a UID/time header line, the column
    /// header row, then one row per graded trial.
    pub fn write(
        &self,
        uid: &str,
        taken_at: DateTime<Utc>,
        records: &[TrialRecord],
    ) -> Result<PathBuf, ReportError> {
        let stamp = taken_at.with_timezone(&self.zone);
        let path = self
            .out_dir
            .join(format!("{}_{}.csv", uid, stamp.format(FILE_STAMP)));

        let mut lines = Vec::with_capacity(records.len() + 2);
        lines.push(format!(
            "UID: {}, Experiment Time: {}",
            uid,
            stamp.format(HEADER_STAMP)
        ));
        lines.push(CSV_HEADERS.join(","));
        for record in records {
            let reaction = record
                .reaction_ms
                .map_or_else(|| "N/A".to_owned(), |ms| ms.to_string());
            lines.push(format!(
                "{},{},{},{}",
                record.step, record.stimulus, record.correct, reaction
            ));
        }
        let mut body = lines.join("\n");
        body.push('\n');

        fs::write(&path, body).map_err(|source| ReportError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), rows = records.len(), "results written");
        Ok(path)
    }

    /// Same records as machine-readable JSON, alongside the CSV.
    pub fn write_json(
        &self,
        uid: &str,
        taken_at: DateTime<Utc>,
        records: &[TrialRecord],
    ) -> Result<PathBuf, ReportError> {
        let stamp = taken_at.with_timezone(&self.zone);
        let path = self
            .out_dir
            .join(format!("{}_{}.json", uid, stamp.format(FILE_STAMP)));

        let body = serde_json::to_vec_pretty(records)?;
        fs::write(&path, body).map_err(|source| ReportError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), rows = records.len(), "results exported");
        Ok(path)
    }
}
