use crate::classify::RuleClassifier;
use crate::cli::Cli;
use crate::config::{self, CompareConfig};
use crate::diff::{self, CompareOptions};
use crate::error::Result;
use crate::model::CostTable;
use crate::profile::{
    CostTableParser, InputFormat, PprofExtractor, ProfileSource, TopReportParser, load_cost_table,
};
use crate::report::{ComparisonReport, DisplayOptions, ReportFormat, RunSummary, Thresholds};
use crate::util::{ProgressMode, StepProgress};
use anyhow::Context;
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

/// Execute the comparison.
///
/// Configuration and exclude patterns are validated before either profile
/// is extracted.
///
/// # Errors
///
/// Returns an error if configuration is invalid, extraction or parsing of
/// either profile fails, or the report cannot be written.
pub fn execute(cli: &Cli) -> Result<()> {
    let project_dir = env::current_dir()?;
    let config = config::load_config(&project_dir, cli.config.as_deref(), &cli.overrides())?;
    let options = CompareOptions::new(config.threshold_pct, config.min_delta_ms, &config.exclude)?;

    let extractor = PprofExtractor::new(&config.go_binary, config.nodecount, config.timeout);
    let parser = TopReportParser;
    let mode = ProgressMode::detect(cli.quiet);

    let old = load_with_progress(&cli.old_profile, cli.input_format, &extractor, &parser, mode)?;
    let new = load_with_progress(&cli.new_profile, cli.input_format, &extractor, &parser, mode)?;

    let report = build_report(
        &cli.old_profile,
        &cli.new_profile,
        &old,
        &new,
        &config,
        &options,
    );
    let display = DisplayOptions::from_config(&config);
    let format = if cli.json {
        ReportFormat::Json
    } else {
        ReportFormat::Text
    };

    write_report(&report, format, &display, cli.output.as_deref())
}

/// Render the report in full, then write it to `output` or stdout.
///
/// The output file is only created once rendering has succeeded.
///
/// # Errors
///
/// Returns an error if rendering fails or the destination cannot be written.
/// File errors name the path.
pub fn write_report(
    report: &ComparisonReport,
    format: ReportFormat,
    display: &DisplayOptions,
    output: Option<&Path>,
) -> Result<()> {
    let mut buf = Vec::new();
    report.render(format, display, &mut buf)?;

    if let Some(path) = output {
        fs::write(path, &buf)
            .with_context(|| format!("cannot write report file {}", path.display()))?;
        info!(path = %path.display(), bytes = buf.len(), "Report written");
        eprintln!("Results written to {}", path.display());
    } else {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        lock.write_all(&buf)?;
        lock.flush()?;
    }

    Ok(())
}

/// Run the diff engine and wrap the result with header metadata.
#[must_use]
pub fn build_report(
    old_path: &Path,
    new_path: &Path,
    old: &CostTable,
    new: &CostTable,
    config: &CompareConfig,
    options: &CompareOptions,
) -> ComparisonReport {
    let classifier = RuleClassifier::with_own_prefix(&config.own_prefix);
    let result = diff::compare(old, new, options, &classifier);

    ComparisonReport {
        old: RunSummary::from_table(old_path.display().to_string(), old),
        new: RunSummary::from_table(new_path.display().to_string(), new),
        thresholds: Thresholds::from_config(config),
        result,
    }
}

fn load_with_progress(
    path: &Path,
    format: InputFormat,
    extractor: &dyn ProfileSource,
    parser: &dyn CostTableParser,
    mode: ProgressMode,
) -> Result<CostTable> {
    let step = StepProgress::start(
        &format!("Extracting profile: {} ...", path.display()),
        mode,
    );
    let loaded = load_cost_table(path, format, extractor, parser);
    step.finish();
    loaded
}
