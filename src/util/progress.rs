//! Progress indicators for profile extraction.
//!
//! Extraction shells out to `go tool pprof` and can take seconds per
//! profile. A spinner is drawn on stderr when it is a terminal; otherwise a
//! one-line note is printed so piped runs still show what is happening.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{IsTerminal, stderr};
use std::time::Duration;

/// Check if we should show progress indicators.
///
/// Progress is shown only if stderr is an interactive terminal.
#[must_use]
pub fn should_show_progress() -> bool {
    stderr().is_terminal()
}

/// Create a spinner for indeterminate operations.
///
/// # Panics
/// Panics if the spinner template string is invalid.
#[must_use]
pub fn create_spinner(message: &str, show: bool) -> ProgressBar {
    let pb = ProgressBar::new_spinner();

    if show {
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .expect("valid template"),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
    } else {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }

    pb
}

/// How extraction progress is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// Nothing is printed (`--quiet`).
    Silent,
    /// A plain `Extracting profile: <path> ...` line on stderr.
    Note,
    /// An animated spinner on stderr.
    Spinner,
}

impl ProgressMode {
    #[must_use]
    pub fn detect(quiet: bool) -> Self {
        if quiet {
            Self::Silent
        } else if should_show_progress() {
            Self::Spinner
        } else {
            Self::Note
        }
    }
}

/// Progress for one extraction step.
pub struct StepProgress {
    bar: ProgressBar,
}

impl StepProgress {
    /// Announce the start of a step.
    #[must_use]
    pub fn start(message: &str, mode: ProgressMode) -> Self {
        if mode == ProgressMode::Note {
            eprintln!("{message}");
        }
        Self {
            bar: create_spinner(message, mode == ProgressMode::Spinner),
        }
    }

    /// Finish and clear the spinner.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
