use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;

/// Command-line interface definition.
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Run an image converter and check its output against a recorded fixture",
    long_about = None
)]
pub struct Cli {
    /// Converter executable, invoked as `<EXECUTABLE> <IMAGE> -output <TEMPFILE>`.
    #[arg(value_name = "EXECUTABLE")]
    pub executable: PathBuf,

    /// Input image forwarded to the converter.
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Fixture the converter output must match byte for byte.
    #[arg(value_name = "EXPECTED")]
    pub expected: PathBuf,
}

/// Derived configuration passed to the harness.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub executable: PathBuf,
    pub image: PathBuf,
    pub expected: PathBuf,
    pub progress: ProgressKind,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ProgressKind {
    Fancy,
    Quiet,
}

impl Cli {
    pub fn build(self) -> Result<HarnessConfig> {
        if !self.expected.exists() {
            bail!("expected output {:?} does not exist", self.expected);
        }

        let progress = if std::io::stderr().is_terminal() {
            ProgressKind::Fancy
        } else {
            ProgressKind::Quiet
        };

        Ok(HarnessConfig {
            executable: self.executable,
            image: self.image,
            expected: self.expected,
            progress,
        })
    }
}
