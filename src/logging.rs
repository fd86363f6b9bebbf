//! Tracing subscriber setup.
//!
//! All diagnostics go to stderr so stdout stays reserved for the report.
//! `RUST_LOG` always wins over the verbosity flags.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::{
    self,
    format::{Format, Json, JsonFields},
};
use tracing_subscriber::prelude::*;

/// Map `-q` / `-v` counts onto a default filter directive.
#[must_use]
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// Human-readable events go to stderr. When `log_file` is set, the same
/// events are appended to the file as one JSON object per line.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a global subscriber
/// is already installed.
pub fn init_logging(
    verbose: u8,
    quiet: bool,
    log_file: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let file_layer = match log_file {
        Some(path) => Some(json_file_layer(path)?),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(file_layer)
        .try_init()?;

    Ok(())
}

/// JSON-lines layer appending to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened for appending.
pub fn json_file_layer<S>(
    path: &Path,
) -> io::Result<fmt::Layer<S, JsonFields, Format<Json>, Mutex<File>>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(fmt::layer()
        .json()
        .with_ansi(false)
        .with_writer(Mutex::new(file)))
}

/// Subscriber for unit and integration tests. Safe to call repeatedly.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
