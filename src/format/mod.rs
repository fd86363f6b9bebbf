//! Output formatting for `pprof_compare`.
//!
//! - [`text`] - millisecond, percent-change and function-name cells
//! - [`table`] - column-width-adaptive plain text tables

mod table;
mod text;

pub use table::Table;
pub use text::{
    APPEARED_MARKER, DEFAULT_MAX_NAME_LEN, NAME_REWRITES, format_change, format_ms, shorten_name,
    truncate_name,
};
