use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use tempfile::Builder as TempFileBuilder;

use crate::cli::HarnessConfig;
use crate::compare;
use crate::runner::{self, Invocation};
use crate::ui::{StepOutcome, StepProgress};

const TEMP_PREFIX: &str = "EtcToolTest";

/// Runs the converter into a scoped temp file and checks it against the fixture.
pub fn run(config: &HarnessConfig, progress: &StepProgress) -> Result<()> {
    // Handle closed right away so the converter can open the path itself; the
    // `TempPath` guard deletes the file on every return path.
    let output = TempFileBuilder::new()
        .prefix(TEMP_PREFIX)
        .tempfile()
        .context("creating temporary output file")?
        .into_temp_path();

    let result = convert_and_compare(config, &output, progress);
    if let Err(err) = &result {
        progress.step_failed(err);
    }
    result
}

fn convert_and_compare(
    config: &HarnessConfig,
    output: &Path,
    progress: &StepProgress,
) -> Result<()> {
    progress.step_started(format!("running {}", config.executable.display()));
    let invocation = Invocation {
        executable: &config.executable,
        image: &config.image,
        output,
    };
    let run = runner::run_converter(&invocation)
        .with_context(|| format!("converting {}", config.image.display()))?;
    progress.step_finished(StepOutcome {
        label: format!("converted {}", config.image.display()),
        elapsed: run.elapsed,
        bytes: fs::metadata(output).ok().map(|meta| meta.len()),
    });
    forward_stderr(&run.stderr);

    progress.step_started(format!("comparing against {}", config.expected.display()));
    let start = Instant::now();
    if !compare::files_match(output, &config.expected)? {
        bail!("expected output {} not produced", config.expected.display());
    }
    progress.step_finished(StepOutcome {
        label: format!("output matches {}", config.expected.display()),
        elapsed: start.elapsed(),
        bytes: fs::metadata(&config.expected).ok().map(|meta| meta.len()),
    });

    Ok(())
}

fn forward_stderr(captured: &[u8]) {
    if captured.is_empty() {
        return;
    }
    let mut stderr = io::stderr().lock();
    let _ = stderr.write_all(captured);
    let _ = stderr.flush();
}
