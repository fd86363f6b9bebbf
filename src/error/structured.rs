//! Structured error output.
//!
//! Provides machine-parseable error information with:
//! - Error codes for categorization
//! - Hints for self-correction
//! - Context for debugging
//!
//! Human output goes to stderr as `Error: ...` / `Hint: ...`; with `--json`
//! the same data is emitted as a single JSON object so CI jobs can tell an
//! extraction failure apart from a malformed report.

use crate::error::CompareError;
use serde::Serialize;
use serde_json::{Value, json};

/// Machine-readable error codes.
///
/// These codes are stable and can be used for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCode {
    // === Extraction Errors (exit code 2) ===
    /// Extractor binary could not be spawned
    ExtractorUnavailable,
    /// Extractor exited non-zero
    ExtractionFailed,
    /// Extractor exceeded its timeout
    ExtractionTimeout,
    /// Input profile missing
    ProfileNotFound,

    // === Parse Errors (exit code 3) ===
    /// Malformed numeric field in a report row
    ReportParseError,

    // === Config Errors (exit code 4) ===
    /// Invalid exclude regex
    InvalidPattern,
    /// Configuration error
    ConfigError,
    /// Config file parse error
    ConfigParseError,

    // === I/O Errors (exit code 5) ===
    /// File I/O error
    IoError,
    /// JSON serialization error
    JsonError,

    // === Internal Errors (exit code 1) ===
    /// Unexpected internal error
    InternalError,
}

impl ErrorCode {
    /// Map an error onto its code.
    ///
    /// Ad-hoc errors wrapping an `io::Error` count as I/O failures.
    #[must_use]
    pub fn from_error(err: &CompareError) -> Self {
        match err {
            CompareError::ExtractorSpawn { .. } => Self::ExtractorUnavailable,
            CompareError::ExtractionFailed { .. } => Self::ExtractionFailed,
            CompareError::ExtractionTimeout { .. } => Self::ExtractionTimeout,
            CompareError::ReportNotFound { .. } => Self::ProfileNotFound,
            CompareError::Parse { .. } => Self::ReportParseError,
            CompareError::InvalidPattern { .. } => Self::InvalidPattern,
            CompareError::Config(_) => Self::ConfigError,
            CompareError::Yaml(_) => Self::ConfigParseError,
            CompareError::Io(_) => Self::IoError,
            CompareError::Json(_) => Self::JsonError,
            CompareError::Other(inner) if inner.downcast_ref::<std::io::Error>().is_some() => {
                Self::IoError
            }
            CompareError::Other(_) => Self::InternalError,
        }
    }

    /// Get the string representation for JSON output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ExtractorUnavailable => "EXTRACTOR_UNAVAILABLE",
            Self::ExtractionFailed => "EXTRACTION_FAILED",
            Self::ExtractionTimeout => "EXTRACTION_TIMEOUT",
            Self::ProfileNotFound => "PROFILE_NOT_FOUND",
            Self::ReportParseError => "REPORT_PARSE_ERROR",
            Self::InvalidPattern => "INVALID_PATTERN",
            Self::ConfigError => "CONFIG_ERROR",
            Self::ConfigParseError => "CONFIG_PARSE_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Get the exit code for this error category.
    ///
    /// - 1: Internal/unknown errors
    /// - 2: Extraction errors
    /// - 3: Report parse errors
    /// - 4: Config errors
    /// - 5: I/O errors
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ExtractorUnavailable
            | Self::ExtractionFailed
            | Self::ExtractionTimeout
            | Self::ProfileNotFound => 2,
            Self::ReportParseError => 3,
            Self::InvalidPattern | Self::ConfigError | Self::ConfigParseError => 4,
            Self::IoError | Self::JsonError => 5,
            Self::InternalError => 1,
        }
    }
}

/// Structured error for machine-parseable output.
#[derive(Debug, Clone, Serialize)]
pub struct StructuredError {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional hint for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Additional context data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl StructuredError {
    /// Create a new structured error from a `CompareError`.
    #[must_use]
    pub fn from_error(err: &CompareError) -> Self {
        Self {
            code: ErrorCode::from_error(err),
            message: match err {
                CompareError::Other(inner) => format!("{inner:#}"),
                _ => err.to_string(),
            },
            hint: err.suggestion().map(str::to_string),
            context: Self::extract_context(err),
        }
    }

    /// Serialize to JSON value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "error": {
                "code": self.code.as_str(),
                "message": self.message,
                "hint": self.hint,
                "context": self.context,
            }
        })
    }

    /// Format for human-readable output.
    #[must_use]
    pub fn to_human(&self, color: bool) -> String {
        let mut output = String::new();

        if color {
            output.push_str("\x1b[31mError:\x1b[0m ");
        } else {
            output.push_str("Error: ");
        }

        output.push_str(&self.message);

        if let Some(hint) = &self.hint {
            output.push('\n');
            if color {
                output.push_str("\x1b[33mHint:\x1b[0m ");
            } else {
                output.push_str("Hint: ");
            }
            output.push_str(hint);
        }

        output
    }

    fn extract_context(err: &CompareError) -> Option<Value> {
        match err {
            CompareError::ExtractorSpawn { program, .. } => Some(json!({"program": program})),
            CompareError::ExtractionFailed { path, status, .. } => Some(json!({
                "path": path.display().to_string(),
                "status": status,
            })),
            CompareError::ExtractionTimeout { path, timeout } => Some(json!({
                "path": path.display().to_string(),
                "timeout_secs": timeout.as_secs(),
            })),
            CompareError::ReportNotFound { path } => {
                Some(json!({"path": path.display().to_string()}))
            }
            CompareError::Parse { line, token } => Some(json!({"line": line, "token": token})),
            CompareError::InvalidPattern { pattern, .. } => Some(json!({"pattern": pattern})),
            _ => None,
        }
    }
}
