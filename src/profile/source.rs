//! Where report text comes from.
//!
//! A [`ProfileSource`] turns an input path into the `-top` text the parser
//! understands. [`PprofExtractor`] shells out to `go tool pprof`;
//! [`TextReportSource`] reads a report that was extracted earlier.

use crate::error::{CompareError, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// How an input path should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum InputFormat {
    /// `.txt` / `.top` files are text reports, anything else is a pprof archive.
    #[default]
    Auto,
    /// Binary pprof archive, run through `go tool pprof -top`.
    Pprof,
    /// Text already produced by `go tool pprof -top`.
    Text,
}

impl InputFormat {
    /// Resolve `Auto` against a concrete path.
    #[must_use]
    pub fn resolve(self, path: &Path) -> Self {
        match self {
            Self::Auto => {
                let is_text = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| {
                        ext.eq_ignore_ascii_case("txt") || ext.eq_ignore_ascii_case("top")
                    });
                if is_text { Self::Text } else { Self::Pprof }
            }
            other => other,
        }
    }
}

/// Produces report text for one profile.
pub trait ProfileSource {
    /// Read or extract the report for `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is missing or extraction fails.
    fn report_text(&self, path: &Path) -> Result<String>;
}

/// Reads a previously extracted `-top` report from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextReportSource;

impl ProfileSource for TextReportSource {
    fn report_text(&self, path: &Path) -> Result<String> {
        if !path.is_file() {
            return Err(CompareError::ReportNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), bytes = text.len(), "Read text report");
        Ok(text)
    }
}

/// Runs `go tool pprof -top -nodecount=N <path>` with a hard timeout.
#[derive(Debug, Clone)]
pub struct PprofExtractor {
    pub go_binary: PathBuf,
    pub nodecount: usize,
    pub timeout: Duration,
}

impl PprofExtractor {
    #[must_use]
    pub fn new(go_binary: impl Into<PathBuf>, nodecount: usize, timeout: Duration) -> Self {
        Self {
            go_binary: go_binary.into(),
            nodecount,
            timeout,
        }
    }

    fn command(&self, path: &Path) -> Command {
        let mut cmd = Command::new(&self.go_binary);
        cmd.arg("tool")
            .arg("pprof")
            .arg("-top")
            .arg(format!("-nodecount={}", self.nodecount))
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl ProfileSource for PprofExtractor {
    fn report_text(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(CompareError::ReportNotFound {
                path: path.to_path_buf(),
            });
        }

        info!(
            path = %path.display(),
            nodecount = self.nodecount,
            timeout_secs = self.timeout.as_secs(),
            "Running pprof"
        );

        let mut child = self
            .command(path)
            .spawn()
            .map_err(|source| CompareError::ExtractorSpawn {
                program: self.go_binary.display().to_string(),
                source,
            })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let Some(status) = wait_with_timeout(&mut child, self.timeout)? else {
            warn!(path = %path.display(), "pprof timed out, killing it");
            let _ = child.kill();
            let _ = child.wait();
            return Err(CompareError::ExtractionTimeout {
                path: path.to_path_buf(),
                timeout: self.timeout,
            });
        };

        let stdout = join_output(stdout);
        let stderr = join_output(stderr);

        if !status.success() {
            return Err(CompareError::ExtractionFailed {
                path: path.to_path_buf(),
                status: status.code(),
                stderr,
            });
        }

        debug!(path = %path.display(), bytes = stdout.len(), "pprof finished");
        Ok(stdout)
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<String>> {
    pipe.map(|mut reader| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = reader.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

fn join_output(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}
