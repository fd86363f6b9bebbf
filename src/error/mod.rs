//! Error types and handling for `pprof_compare`.
//!
//! Every failure in this tool is terminal for the invocation: a comparison
//! built from a half-extracted or half-parsed profile could silently
//! misclassify cost deltas, so nothing here is retried or downgraded to a
//! warning.
//!
//! # Design
//!
//! - Uses `thiserror` for derive-based error types
//! - Wraps `anyhow` for ad-hoc context at the CLI edge
//! - Provides recovery hints for user-facing errors
//! - Maps each error onto a stable exit code via [`ErrorCode`]

mod structured;

pub use structured::{ErrorCode, StructuredError};

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Primary error type for `pprof_compare` operations.
#[derive(Error, Debug)]
pub enum CompareError {
    // === Extraction Errors ===
    /// The extractor binary could not be started at all.
    #[error("Failed to run '{program}': {source}")]
    ExtractorSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The extractor exited with a non-zero status.
    #[error("Error running pprof on {}:\n{stderr}", path.display())]
    ExtractionFailed {
        path: PathBuf,
        status: Option<i32>,
        stderr: String,
    },

    /// The extractor did not finish within the configured timeout.
    #[error("pprof on {} timed out after {}s", path.display(), timeout.as_secs())]
    ExtractionTimeout { path: PathBuf, timeout: Duration },

    /// An input profile or report does not exist.
    #[error("Profile not found: {}", path.display())]
    ReportNotFound { path: PathBuf },

    // === Parse Errors ===
    /// A data row carried a numeric field that is not a valid float.
    #[error("Parse error at line {line}: invalid number '{token}'")]
    Parse { line: usize, token: String },

    // === Configuration Errors ===
    /// An exclude pattern is not a valid regular expression.
    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Configuration value or file error.
    #[error("Configuration error: {0}")]
    Config(String),

    // === I/O Errors ===
    /// File system or stream I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Wrapped anyhow error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CompareError {
    /// Can the user fix this without code changes?
    #[must_use]
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ExtractorSpawn { .. }
                | Self::ReportNotFound { .. }
                | Self::InvalidPattern { .. }
                | Self::Config(_)
                | Self::ExtractionTimeout { .. }
        )
    }

    /// Human-friendly suggestion for fixing this error.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::ExtractorSpawn { .. } => {
                Some("Install the Go toolchain or point the 'go' config key at it")
            }
            Self::ExtractionTimeout { .. } => Some("Raise the timeout with --timeout"),
            Self::ReportNotFound { .. } => Some("Check the profile paths"),
            Self::InvalidPattern { .. } => {
                Some("Exclude patterns are regular expressions; escape literal dots and parens")
            }
            Self::Parse { .. } => Some("Pass the raw output of 'go tool pprof -top'"),
            Self::ExtractionFailed { .. } => Some("Check that the file is a valid pprof profile"),
            _ => None,
        }
    }

    /// Get the exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        ErrorCode::from_error(self).exit_code()
    }

    /// Create a configuration error.
    #[must_use]
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config(reason.into())
    }
}

/// Result type using `CompareError`.
pub type Result<T> = std::result::Result<T, CompareError>;
