//! CLI definitions and entry point.

use crate::config::CliOverrides;
use crate::profile::InputFormat;
use clap::Parser;
use std::path::PathBuf;

pub mod commands;

/// Compare two pprof CPU profiles and report per-function regressions
#[derive(Parser, Debug)]
#[command(name = "pprof-compare", author, version, about, long_about = None)]
pub struct Cli {
    /// Baseline profile (.prof, or a saved `pprof -top` report)
    pub old_profile: PathBuf,

    /// Candidate profile to compare against the baseline
    pub new_profile: PathBuf,

    /// Percent change required to flag a regression or improvement [default: 30]
    #[arg(long, value_name = "PCT")]
    pub threshold: Option<f64>,

    /// Minimum absolute change in ms to flag [default: 50]
    #[arg(long, value_name = "MS")]
    pub min_delta: Option<f64>,

    /// Regex of function names to ignore (repeatable)
    #[arg(long, value_name = "REGEX")]
    pub exclude: Vec<String>,

    /// Rows shown per section [default: 20]
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Number of nodes requested from pprof [default: 300]
    #[arg(long, value_name = "N")]
    pub nodecount: Option<usize>,

    /// Seconds to wait for each pprof extraction [default: 60]
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Go toolchain binary used to run pprof [default: go]
    #[arg(long, value_name = "PATH")]
    pub go: Option<PathBuf>,

    /// Prefix identifying your own packages [default: game_main/]
    #[arg(long, value_name = "PREFIX")]
    pub own_prefix: Option<String>,

    /// Maximum display width of function names [default: 55]
    #[arg(long, value_name = "COLS")]
    pub max_name_len: Option<usize>,

    /// How to read the inputs
    #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
    pub input_format: InputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Config file (defaults to ./.pprof-compare.yaml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Also append logs to this file as JSON lines
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (no output except the report and errors)
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Flags that take precedence over config files and environment.
    #[must_use]
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            threshold: self.threshold,
            min_delta: self.min_delta,
            exclude: self.exclude.clone(),
            top: self.top,
            nodecount: self.nodecount,
            timeout: self.timeout,
            go: self.go.clone(),
            max_name_len: self.max_name_len,
            own_prefix: self.own_prefix.clone(),
        }
    }
}
