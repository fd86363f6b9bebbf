//! Column-width-adaptive plain text tables.
//!
//! ```text
//!   Function | Old Cum | New Cum
//!   ---------+---------+--------
//!   main.run | 100ms   | 250ms
//! ```

use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

const INDENT: &str = "  ";
const CELL_SEPARATOR: &str = " | ";
const RULE_SEPARATOR: &str = "-+-";
const EMPTY_MARKER: &str = "(none)";

/// A header row plus body rows, all cells pre-formatted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Short rows are padded with empty cells.
    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Each column is as wide as its widest cell, header included.
    #[must_use]
    pub fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.width()).collect();
        for row in &self.rows {
            for (idx, cell) in row.iter().enumerate().take(widths.len()) {
                widths[idx] = widths[idx].max(cell.width());
            }
        }
        widths
    }

    /// Write the table, or `(none)` when it has no rows.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        if self.rows.is_empty() {
            return writeln!(out, "{INDENT}{EMPTY_MARKER}");
        }

        let widths = self.column_widths();

        writeln!(out, "{INDENT}{}", join_padded(&self.headers, &widths))?;
        let rule = widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join(RULE_SEPARATOR);
        writeln!(out, "{INDENT}{rule}")?;

        for row in &self.rows {
            writeln!(out, "{INDENT}{}", join_padded(row, &widths))?;
        }
        Ok(())
    }

    /// Render to a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

fn join_padded(cells: &[String], widths: &[usize]) -> String {
    widths
        .iter()
        .enumerate()
        .map(|(idx, width)| {
            let cell = cells.get(idx).map_or("", String::as_str);
            pad_right(cell, *width)
        })
        .collect::<Vec<_>>()
        .join(CELL_SEPARATOR)
}

fn pad_right(cell: &str, width: usize) -> String {
    let visible = cell.width();
    let mut out = String::with_capacity(cell.len() + width.saturating_sub(visible));
    out.push_str(cell);
    out.push_str(&" ".repeat(width.saturating_sub(visible)));
    out
}
