//! Report rendering.
//!
//! A [`ComparisonReport`] bundles the diff result with the run metadata the
//! header needs. It renders either as the human-readable text report or as
//! JSON. Rendering never changes what was classified: names are shortened
//! for display only.

use crate::config::CompareConfig;
use crate::diff::SIGNIFICANCE_FLOOR_MS;
use crate::error::Result;
use crate::format::{Table, format_change, format_ms, shorten_name};
use crate::model::{Category, ComparisonEntry, ComparisonResult, CostTable, OnlyEntry};
use serde::Serialize;
use std::io::Write;

const BANNER_WIDTH: usize = 80;
const TITLE: &str = "PPROF BENCHMARK COMPARISON";

const COMPARISON_HEADERS: [&str; 7] = [
    "Function", "Old Flat", "New Flat", "Flat Chg", "Old Cum", "New Cum", "Cum Chg",
];
const ONLY_HEADERS: [&str; 3] = ["Function", "Flat", "Cum"];

/// Identity and header metadata of one input run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub profile: String,
    pub functions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_sampled_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_s: Option<f64>,
}

impl RunSummary {
    #[must_use]
    pub fn from_table(profile: impl Into<String>, table: &CostTable) -> Self {
        Self {
            profile: profile.into(),
            functions: table.len(),
            total_sampled_ms: table.total_sampled_ms,
            duration_s: table.duration_s,
        }
    }
}

/// Tolerance policy the result was computed with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thresholds {
    pub threshold_pct: f64,
    pub min_delta_ms: f64,
    pub significance_floor_ms: f64,
    pub exclude: Vec<String>,
}

impl Thresholds {
    #[must_use]
    pub fn from_config(config: &CompareConfig) -> Self {
        Self {
            threshold_pct: config.threshold_pct,
            min_delta_ms: config.min_delta_ms,
            significance_floor_ms: SIGNIFICANCE_FLOOR_MS,
            exclude: config.exclude.clone(),
        }
    }
}

/// Everything needed to render one comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub old: RunSummary,
    pub new: RunSummary,
    pub thresholds: Thresholds,
    pub result: ComparisonResult,
}

/// Presentation knobs for the text report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Rows shown per section.
    pub top: usize,
    /// Prefix stripped from displayed names.
    pub own_prefix: String,
    pub max_name_len: usize,
}

impl DisplayOptions {
    #[must_use]
    pub fn from_config(config: &CompareConfig) -> Self {
        Self {
            top: config.top,
            own_prefix: config.own_prefix.clone(),
            max_name_len: config.max_name_len,
        }
    }
}

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ComparisonReport {
    /// Render in the requested format.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` or JSON serialization fails.
    pub fn render(
        &self,
        format: ReportFormat,
        display: &DisplayOptions,
        out: &mut dyn Write,
    ) -> Result<()> {
        match format {
            ReportFormat::Text => self.write_text(display, out),
            ReportFormat::Json => self.write_json(out),
        }
    }

    /// Write the pretty-printed JSON document followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_json(&self, out: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out)?;
        Ok(())
    }

    /// Write the text report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_text(&self, display: &DisplayOptions, out: &mut dyn Write) -> Result<()> {
        self.write_header(out)?;
        self.write_summary(out)?;
        self.write_regressions(display, out)?;
        self.write_improvements(display, out)?;
        write_only_section(
            out,
            "NEW FUNCTIONS (not in old profile, cum > 200ms)",
            &self.result.new_only,
            display,
        )?;
        write_only_section(
            out,
            "REMOVED FUNCTIONS (in old profile only, cum > 200ms)",
            &self.result.removed_only,
            display,
        )?;
        writeln!(out, "\n{}", "=".repeat(BANNER_WIDTH))?;
        Ok(())
    }

    /// Render the text report into a string.
    ///
    /// # Errors
    ///
    /// Returns an error only if formatting fails.
    pub fn to_text(&self, display: &DisplayOptions) -> Result<String> {
        let mut buf = Vec::new();
        self.write_text(display, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn write_header(&self, out: &mut dyn Write) -> Result<()> {
        let banner = "=".repeat(BANNER_WIDTH);
        writeln!(out, "{banner}\n{TITLE}\n{banner}\n")?;

        writeln!(out, "Old profile: {}", self.old.profile)?;
        writeln!(out, "New profile: {}", self.new.profile)?;
        if let Some(duration) = present(self.old.duration_s) {
            writeln!(out, "Old duration: {duration:.1}s")?;
        }
        if let Some(duration) = present(self.new.duration_s) {
            writeln!(out, "New duration: {duration:.1}s")?;
        }
        if let (Some(old_total), Some(new_total)) = (
            present(self.old.total_sampled_ms),
            present(self.new.total_sampled_ms),
        ) {
            writeln!(out, "Old total samples: {}", format_ms(old_total))?;
            writeln!(out, "New total samples: {}", format_ms(new_total))?;
            writeln!(
                out,
                "Total sample delta: {} ({})",
                format_ms(new_total - old_total),
                format_change(old_total, new_total)
            )?;
        }
        Ok(())
    }

    fn write_summary(&self, out: &mut dyn Write) -> Result<()> {
        let result = &self.result;
        writeln!(out, "\nCommon functions compared: {}", result.common_count)?;
        writeln!(out, "Excluded by patterns: {}", result.excluded_count)?;
        writeln!(
            out,
            "Regression threshold: >{}% and >{}ms delta",
            self.thresholds.threshold_pct, self.thresholds.min_delta_ms
        )?;
        writeln!(out, "Regressions found: {}", result.regressions.len())?;
        writeln!(out, "Improvements found: {}", result.improvements.len())?;
        writeln!(out, "Stable: {}", result.stable.len())?;
        Ok(())
    }

    fn write_regressions(&self, display: &DisplayOptions, out: &mut dyn Write) -> Result<()> {
        for category in Category::DISPLAY_ORDER {
            let mut rows: Vec<&ComparisonEntry> = self.result.regressions_in(category).collect();
            if rows.is_empty() {
                continue;
            }
            rows.truncate(display.top);
            write_section_title(
                out,
                &format!("REGRESSIONS: {category} (sorted by cumulative delta)"),
            )?;
            comparison_table(&rows, display).write_to(out)?;
        }
        Ok(())
    }

    fn write_improvements(&self, display: &DisplayOptions, out: &mut dyn Write) -> Result<()> {
        let mut heading_written = false;
        for category in Category::DISPLAY_ORDER {
            let mut rows: Vec<&ComparisonEntry> = self.result.improvements_in(category).collect();
            if rows.is_empty() {
                continue;
            }
            rows.truncate(display.top);
            if !heading_written {
                write_section_title(out, "IMPROVEMENTS (sorted by cumulative delta)")?;
                heading_written = true;
            }
            writeln!(out, "\n  [{category}]")?;
            comparison_table(&rows, display).write_to(out)?;
        }
        Ok(())
    }
}

/// Zero and missing header values are both omitted.
#[allow(clippy::float_cmp)]
fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

fn write_section_title(out: &mut dyn Write, title: &str) -> Result<()> {
    let rule = "─".repeat(BANNER_WIDTH);
    writeln!(out, "\n{rule}\n{title}\n{rule}")?;
    Ok(())
}

fn write_only_section(
    out: &mut dyn Write,
    title: &str,
    entries: &[OnlyEntry],
    display: &DisplayOptions,
) -> Result<()> {
    if entries.is_empty() {
        return Ok(());
    }
    write_section_title(out, title)?;

    let mut table = Table::new(ONLY_HEADERS);
    for entry in entries.iter().take(display.top) {
        table.push_row(vec![
            shorten_name(&entry.name, &display.own_prefix, display.max_name_len),
            format_ms(entry.exclusive_ms),
            format_ms(entry.inclusive_ms),
        ]);
    }
    table.write_to(out)?;
    Ok(())
}

fn comparison_table(entries: &[&ComparisonEntry], display: &DisplayOptions) -> Table {
    let mut table = Table::new(COMPARISON_HEADERS);
    for entry in entries {
        table.push_row(vec![
            shorten_name(&entry.name, &display.own_prefix, display.max_name_len),
            format_ms(entry.old_exclusive_ms),
            format_ms(entry.new_exclusive_ms),
            format_change(entry.old_exclusive_ms, entry.new_exclusive_ms),
            format_ms(entry.old_inclusive_ms),
            format_ms(entry.new_inclusive_ms),
            format_change(entry.old_inclusive_ms, entry.new_inclusive_ms),
        ]);
    }
    table
}
