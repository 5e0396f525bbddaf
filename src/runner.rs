use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use thiserror::Error;

/// One converter run: `<executable> <image> -output <output>`.
#[derive(Debug, Clone)]
pub struct Invocation<'a> {
    pub executable: &'a Path,
    pub image: &'a Path,
    pub output: &'a Path,
}

#[derive(Debug)]
pub struct ConverterRun {
    pub stderr: Vec<u8>,
    pub elapsed: Duration,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("starting converter {program} failed")]
    Launch {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("waiting for converter {program} failed")]
    Wait {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("converter {program} exited with {status}\n{stderr}")]
    Exited {
        program: PathBuf,
        status: ExitStatus,
        stderr: String,
    },
}

/// Runs the converter to completion and captures its standard error.
pub fn run_converter(invocation: &Invocation<'_>) -> Result<ConverterRun, RunError> {
    let start = Instant::now();
    let program = invocation.executable.to_path_buf();

    let child = Command::new(invocation.executable)
        .arg(invocation.image)
        .arg("-output")
        .arg(invocation.output)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| RunError::Launch {
            program: program.clone(),
            source,
        })?;

    let output = child
        .wait_with_output()
        .map_err(|source| RunError::Wait {
            program: program.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(RunError::Exited {
            program,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_owned(),
        });
    }

    Ok(ConverterRun {
        stderr: output.stderr,
        elapsed: start.elapsed(),
    })
}
