//! Parser for `go tool pprof -top` text output.
//!
//! A typical report looks like:
//!
//! ```text
//! File: game
//! Type: cpu
//! Duration: 30.13s, Total samples = 42.57s (141.27%)
//! Showing nodes accounting for 40.25s, 94.56% of 42.57s total
//!       flat  flat%   sum%        cum   cum%
//!     16.14s 37.92% 37.92%     16.52s 38.80%  runtime.cgocall
//!      120ms  0.28% 38.20%      2.10s  4.93%  game_main/world.(*Map).Update
//! ```
//!
//! Header fields are optional. Lines that do not have the row shape are
//! skipped silently; a row whose numbers fail to parse aborts the parse.

use crate::error::{CompareError, Result};
use crate::model::{CostEntry, CostTable};
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::{debug, trace};

static TOTAL_SAMPLES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Total samples\s*=\s*([\d.]+)(ms|s)").expect("valid total samples regex")
});

static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Duration:\s*([\d.]+)s").expect("valid duration regex"));

static ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([\d.]+)(ms|s)\s+[\d.]+%\s+[\d.]+%\s+([\d.]+)(ms|s)\s+[\d.]+%\s+(.+)$")
        .expect("valid row regex")
});

/// Turns extractor output into a [`CostTable`].
///
/// Kept narrow so a structured profile decoder can replace the text parser
/// without touching the diff engine or renderer.
pub trait CostTableParser {
    /// Parse one report.
    ///
    /// # Errors
    ///
    /// Returns [`CompareError::Parse`] when a numeric field is malformed.
    fn parse(&self, text: &str) -> Result<CostTable>;
}

/// Regex-driven parser for the pprof `-top` table.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopReportParser;

impl CostTableParser for TopReportParser {
    fn parse(&self, text: &str) -> Result<CostTable> {
        parse_top_report(text)
    }
}

/// Parse pprof `-top` output into a cost table.
///
/// # Errors
///
/// Returns [`CompareError::Parse`] with the 1-based line number when a
/// numeric token cannot be parsed as a float.
pub fn parse_top_report(text: &str) -> Result<CostTable> {
    let mut table = CostTable::default();
    let mut rows = 0usize;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;

        if table.total_sampled_ms.is_none() {
            if let Some(caps) = TOTAL_SAMPLES_RE.captures(line) {
                table.total_sampled_ms = Some(to_ms(&caps, 1, 2, line_no)?);
            }
        }
        if table.duration_s.is_none() {
            if let Some(caps) = DURATION_RE.captures(line) {
                table.duration_s = Some(parse_number(&caps[1], line_no)?);
            }
        }

        let Some(caps) = ROW_RE.captures(line) else {
            continue;
        };

        let exclusive_ms = to_ms(&caps, 1, 2, line_no)?;
        let inclusive_ms = to_ms(&caps, 3, 4, line_no)?;
        let name = caps[5].trim().to_string();

        trace!(line = line_no, %name, exclusive_ms, inclusive_ms, "Parsed row");
        if table.entries.contains_key(&name) {
            debug!(line = line_no, %name, "Duplicate function row, keeping the later one");
        }
        table
            .entries
            .insert(name.clone(), CostEntry::new(name, exclusive_ms, inclusive_ms));
        rows += 1;
    }

    debug!(
        rows,
        functions = table.entries.len(),
        total_sampled_ms = ?table.total_sampled_ms,
        duration_s = ?table.duration_s,
        "Parsed pprof report"
    );

    Ok(table)
}

fn to_ms(caps: &Captures<'_>, value: usize, unit: usize, line: usize) -> Result<f64> {
    let value = parse_number(&caps[value], line)?;
    Ok(normalize_to_ms(value, &caps[unit]))
}

/// `ms` values are kept, `s` values are scaled by 1000.
#[must_use]
pub fn normalize_to_ms(value: f64, unit: &str) -> f64 {
    if unit == "ms" { value } else { value * 1000.0 }
}

fn parse_number(token: &str, line: usize) -> Result<f64> {
    token.parse::<f64>().map_err(|_| CompareError::Parse {
        line,
        token: token.to_string(),
    })
}
