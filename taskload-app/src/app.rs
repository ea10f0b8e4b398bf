use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::thread;
use taskload_core::{KeyCode, KeyEvent, Level, ParseLevelError};
use taskload_engine::config::DEFAULT_SEQUENCE_LENGTH;
use taskload_engine::{Engine, RunConfig, RunHandle, StimulusDisplay};
use taskload_report::{ResultWriter, RunSummary};
use tracing::{debug, error, info};

#[derive(Debug, Parser)]
#[command(name = "taskload", about = "Timed stimulus-response cognitive experiment")]
pub struct Cli {
    /// Participant identifier stamped into the persisted results.
    #[arg(long)]
    pub uid: String,

    /// easy, medium or difficult.
    #[arg(long, default_value = "easy", value_parser = parse_level)]
    pub level: Level,

    /// Number of stimuli in the run.
    #[arg(long, default_value_t = DEFAULT_SEQUENCE_LENGTH)]
    pub length: usize,

    /// Practice runs grade normally but are not persisted.
    #[arg(long)]
    pub practice: bool,

    /// Where results land; defaults to the platform temp directory.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

fn parse_level(s: &str) -> Result<Level, ParseLevelError> {
    Level::from_str(s)
}

/// Renders stimuli on the terminal. The engine owns all timing; these calls
/// just paint.
struct ConsoleDisplay;

impl StimulusDisplay for ConsoleDisplay {
    fn show_stimulus(&self, value: u8) {
        println!("\n        {value}\n");
    }

    fn clear_screen(&self) {
        print!("\x1b[2J\x1b[H");
        let _ = io::stdout().flush();
    }
}

pub struct App {
    cli: Cli,
}

impl App {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    pub fn run(self) -> Result<()> {
        let mut config = RunConfig::new(self.cli.uid.clone(), self.cli.level);
        config.sequence_length = self.cli.length;
        config.practice = self.cli.practice;

        let mut rng = rand::rng();
        let engine = Engine::new(config, ConsoleDisplay, &mut rng);
        debug!(sequence = ?engine.sequence(), "generated stimulus sequence");
        spawn_input_thread(engine.handle());

        println!("Press Enter when the rule calls for a response; q + Enter stops the run.");
        let report = engine.run();

        let summary = RunSummary::from_records(&report.records);
        info!(%summary, state = ?report.state, "run finished");
        println!("{summary}");

        if report.practice {
            info!("practice run, results not persisted");
            return Ok(());
        }

        let writer = match &self.cli.out_dir {
            Some(dir) => ResultWriter::with_dir(dir),
            None => ResultWriter::new(),
        };
        let taken_at = Utc::now();
        // Losing the file does not invalidate the run.
        if let Err(err) = writer.write(&report.uid, taken_at, &report.records) {
            error!(%err, "could not persist results");
        }
        if let Err(err) = writer.write_json(&report.uid, taken_at, &report.records) {
            error!(%err, "could not export results");
        }
        Ok(())
    }
}

/// Feeds stdin lines to the engine as key events. The terminal is
/// line-buffered, so a bare Enter stands in for the response key.
fn spawn_input_thread(handle: RunHandle) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match line.trim() {
                "q" | "quit" => {
                    handle.stop();
                    break;
                }
                "" => handle.on_key_event(KeyEvent::new(KeyCode::Space)),
                other => {
                    let code = other
                        .chars()
                        .next()
                        .map(KeyCode::Char)
                        .unwrap_or(KeyCode::Enter);
                    handle.on_key_event(KeyEvent::new(code));
                }
            }
        }
    });
}
