use std::cell::RefCell;
use std::time::Duration;

use anyhow::Error;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::cli::ProgressKind;

/// Spinner per harness step on stderr; silent in quiet mode.
pub struct StepProgress {
    kind: ProgressKind,
    current: RefCell<Option<ProgressBar>>,
}

#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub label: String,
    pub elapsed: Duration,
    pub bytes: Option<u64>,
}

impl StepProgress {
    pub fn new(kind: ProgressKind) -> Self {
        Self {
            kind,
            current: RefCell::new(None),
        }
    }

    pub fn step_started(&self, message: String) {
        match self.kind {
            ProgressKind::Quiet => {}
            ProgressKind::Fancy => {
                let spinner = ProgressBar::with_draw_target(
                    None,
                    ProgressDrawTarget::stderr_with_hz(20),
                );
                spinner.set_style(spinner_style());
                spinner.set_message(message);
                spinner.enable_steady_tick(Duration::from_millis(80));
                *self.current.borrow_mut() = Some(spinner);
            }
        }
    }

    pub fn step_finished(&self, outcome: StepOutcome) {
        match self.kind {
            ProgressKind::Quiet => {}
            ProgressKind::Fancy => {
                if let Some(spinner) = self.current.borrow_mut().take() {
                    spinner.finish_with_message(format_success(&outcome));
                }
            }
        }
    }

    pub fn step_failed(&self, error: &Error) {
        match self.kind {
            ProgressKind::Quiet => {}
            ProgressKind::Fancy => {
                if let Some(spinner) = self.current.borrow_mut().take() {
                    // Only the headline; anyhow prints the full chain on exit.
                    spinner.abandon_with_message(format!("✗ {error}"));
                }
            }
        }
    }
}

fn format_success(outcome: &StepOutcome) -> String {
    let mut parts = vec![format_duration(outcome.elapsed)];
    if let Some(bytes) = outcome.bytes {
        parts.push(format_bytes(bytes));
    }
    format!("✓ {} ({})", outcome.label, parts.join(", "))
}

fn format_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let as_f64 = bytes as f64;
    if as_f64 >= GB {
        format!("{:.2} GiB", as_f64 / GB)
    } else if as_f64 >= MB {
        format!("{:.2} MiB", as_f64 / MB)
    } else if as_f64 >= KB {
        format!("{:.2} KiB", as_f64 / KB)
    } else {
        format!("{} B", bytes)
    }
}

fn format_duration(duration: Duration) -> String {
    if duration.as_secs_f64() >= 1.0 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        format!("{} ms", duration.as_millis())
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠁", "⠂", "⠄", "⠂"])
}
