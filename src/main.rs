mod cli;
mod compare;
mod harness;
mod runner;
mod ui;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let parsed = cli::Cli::parse();
    let config = parsed.build()?;

    let progress = ui::StepProgress::new(config.progress);
    harness::run(&config, &progress)
}
