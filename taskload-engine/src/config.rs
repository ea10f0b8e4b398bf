use std::time::Duration;
use taskload_core::{KeyCode, Level};

pub const DEFAULT_SEQUENCE_LENGTH: usize = 50;
pub const PAUSE_INTERVAL: Duration = Duration::from_millis(1600);
pub const RESPONSE_WINDOW: Duration = Duration::from_millis(500);
pub const TOTAL_BUDGET: Duration = Duration::from_secs(4 * 60);

/// Run parameters. Collected by the host (CLI, dialog, ...), consumed here.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub uid: String,
    pub level: Level,
    pub sequence_length: usize,
    /// Practice runs grade exactly like real ones; the flag only tells the
    /// caller not to persist the report.
    pub practice: bool,
    pub pause_interval: Duration,
    pub response_window: Duration,
    pub total_budget: Duration,
    pub response_key: KeyCode,
}

impl RunConfig {
    pub fn new(uid: impl Into<String>, level: Level) -> Self {
        Self {
            uid: uid.into(),
            level,
            sequence_length: DEFAULT_SEQUENCE_LENGTH,
            practice: false,
            pause_interval: PAUSE_INTERVAL,
            response_window: RESPONSE_WINDOW,
            total_budget: TOTAL_BUDGET,
            response_key: KeyCode::Space,
        }
    }
}
