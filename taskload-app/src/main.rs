use anyhow::Result;
use clap::Parser;

mod app;

use app::{App, Cli};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    App::new(Cli::parse()).run()
}
