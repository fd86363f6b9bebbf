//! Profile ingestion: getting report text and turning it into a cost table.

mod parser;
mod source;

pub use parser::{CostTableParser, TopReportParser, normalize_to_ms, parse_top_report};
pub use source::{InputFormat, PprofExtractor, ProfileSource, TextReportSource};

use crate::error::Result;
use crate::model::CostTable;
use std::path::Path;
use tracing::info;

/// Load one profile into a [`CostTable`].
///
/// `format` is resolved against the path first, so `Auto` picks the text
/// reader for `.txt`/`.top` files and `extractor` for everything else.
///
/// # Errors
///
/// Returns an error if extraction or parsing fails.
pub fn load_cost_table(
    path: &Path,
    format: InputFormat,
    extractor: &dyn ProfileSource,
    parser: &dyn CostTableParser,
) -> Result<CostTable> {
    let text = match format.resolve(path) {
        InputFormat::Text => TextReportSource.report_text(path)?,
        InputFormat::Pprof | InputFormat::Auto => extractor.report_text(path)?,
    };
    let table = parser.parse(&text)?;
    info!(path = %path.display(), functions = table.len(), "Loaded cost table");
    Ok(table)
}
