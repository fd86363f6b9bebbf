use clap::Parser;
use pprof_compare::cli::{Cli, commands};
use pprof_compare::logging::init_logging;
use pprof_compare::{CompareError, StructuredError};
use std::io::{self, IsTerminal};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref()) {
        eprintln!("Failed to initialize logging: {e}");
    }

    if let Err(e) = commands::compare::execute(&cli) {
        handle_error(&e, cli.json, cli.no_color);
    }
}

/// Handle errors with structured output support.
///
/// With --json, outputs structured JSON to stderr. Otherwise, outputs a
/// human-readable error with optional color.
fn handle_error(err: &CompareError, json_mode: bool, no_color: bool) -> ! {
    let structured = StructuredError::from_error(err);
    let exit_code = structured.code.exit_code();

    if json_mode {
        let json = structured.to_json();
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
        );
    } else {
        let use_color = !no_color && io::stderr().is_terminal();
        eprintln!("{}", structured.to_human(use_color));
    }

    std::process::exit(exit_code);
}
