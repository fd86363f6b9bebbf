//! Cross-run diff engine.
//!
//! [`compare`] is a pure function of two cost tables and a [`CompareOptions`]
//! value. It never fails once the options are built; every division is
//! guarded.

use crate::classify::FunctionClassifier;
use crate::error::{CompareError, Result};
use crate::model::{
    Category, Classification, ComparisonEntry, ComparisonResult, CostEntry, CostTable, OnlyEntry,
};
use regex::Regex;
use tracing::{debug, info};

/// Minimum inclusive cost for a new/removed function to be reported.
pub const SIGNIFICANCE_FLOOR_MS: f64 = 200.0;

/// Tolerance policy and name filters for one comparison.
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Relative change, in percent, that must be exceeded.
    pub threshold_pct: f64,
    /// Absolute change, in ms, that must be exceeded.
    pub min_delta_ms: f64,
    exclude: Vec<Regex>,
}

impl CompareOptions {
    /// Build options, compiling every exclude pattern up front.
    ///
    /// # Errors
    ///
    /// Returns [`CompareError::InvalidPattern`] for the first pattern that
    /// is not a valid regular expression.
    pub fn new<S: AsRef<str>>(threshold_pct: f64, min_delta_ms: f64, exclude: &[S]) -> Result<Self> {
        let exclude = exclude
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(pattern).map_err(|source| CompareError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            threshold_pct,
            min_delta_ms,
            exclude,
        })
    }

    /// True if any exclude pattern matches anywhere in `name`.
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude.iter().any(|re| re.is_match(name))
    }

    #[must_use]
    pub fn exclude_patterns(&self) -> Vec<&str> {
        self.exclude.iter().map(Regex::as_str).collect()
    }
}

/// Percent change from `old` to `new`.
///
/// A zero baseline yields `100.0` when the value appeared and `0.0` when it
/// stayed at zero, never an infinity.
#[must_use]
pub fn percent_change(old: f64, new: f64) -> f64 {
    if old > 0.0 {
        ((new - old) / old) * 100.0
    } else if new > 0.0 {
        100.0
    } else {
        0.0
    }
}

/// Build the comparison entry for a function present in both runs.
#[must_use]
pub fn compare_entry(
    name: &str,
    category: Category,
    old: &CostEntry,
    new: &CostEntry,
) -> ComparisonEntry {
    let exclusive_delta_ms = new.exclusive_ms - old.exclusive_ms;
    let inclusive_delta_ms = new.inclusive_ms - old.inclusive_ms;
    ComparisonEntry {
        name: name.to_string(),
        category,
        old_exclusive_ms: old.exclusive_ms,
        new_exclusive_ms: new.exclusive_ms,
        exclusive_delta_ms,
        exclusive_pct_change: percent_change(old.exclusive_ms, new.exclusive_ms),
        old_inclusive_ms: old.inclusive_ms,
        new_inclusive_ms: new.inclusive_ms,
        inclusive_delta_ms,
        inclusive_pct_change: percent_change(old.inclusive_ms, new.inclusive_ms),
    }
}

/// Classify one entry. Inclusive cost is the primary signal; exclusive cost
/// alone is enough to trip either verdict.
#[must_use]
pub fn classify_entry(entry: &ComparisonEntry, options: &CompareOptions) -> Classification {
    let threshold = options.threshold_pct;
    let floor = options.min_delta_ms;
    let inclusive_moved = entry.inclusive_delta_ms.abs() > floor;
    let exclusive_moved = entry.exclusive_delta_ms.abs() > floor;

    let regressed = (entry.inclusive_pct_change > threshold && inclusive_moved)
        || (entry.exclusive_pct_change > threshold && exclusive_moved);
    let improved = (entry.inclusive_pct_change < -threshold && inclusive_moved)
        || (entry.exclusive_pct_change < -threshold && exclusive_moved);

    if regressed {
        Classification::Regression
    } else if improved {
        Classification::Improvement
    } else {
        Classification::Stable
    }
}

/// Compare a baseline table against a candidate table.
#[must_use]
pub fn compare(
    old: &CostTable,
    new: &CostTable,
    options: &CompareOptions,
    classifier: &dyn FunctionClassifier,
) -> ComparisonResult {
    let mut result = ComparisonResult::default();

    for (name, old_entry) in &old.entries {
        let Some(new_entry) = new.get(name) else {
            continue;
        };
        if options.is_excluded(name) {
            debug!(%name, "Excluded by pattern");
            result.excluded_count += 1;
            continue;
        }

        let entry = compare_entry(name, classifier.classify(name), old_entry, new_entry);
        match classify_entry(&entry, options) {
            Classification::Regression => result.regressions.push(entry),
            Classification::Improvement => result.improvements.push(entry),
            Classification::Stable => result.stable.push(entry),
        }
        result.common_count += 1;
    }

    result
        .regressions
        .sort_by(|a, b| b.inclusive_delta_ms.total_cmp(&a.inclusive_delta_ms));
    result
        .improvements
        .sort_by(|a, b| a.inclusive_delta_ms.total_cmp(&b.inclusive_delta_ms));

    result.new_only = only_in(new, old, options);
    result.removed_only = only_in(old, new, options);

    info!(
        common = result.common_count,
        excluded = result.excluded_count,
        regressions = result.regressions.len(),
        improvements = result.improvements.len(),
        stable = result.stable.len(),
        new_only = result.new_only.len(),
        removed_only = result.removed_only.len(),
        "Comparison complete"
    );

    result
}

/// Significant functions present in `side` but not in `other`.
fn only_in(side: &CostTable, other: &CostTable, options: &CompareOptions) -> Vec<OnlyEntry> {
    let mut entries: Vec<OnlyEntry> = side
        .entries
        .values()
        .filter(|entry| !other.contains(&entry.name))
        .filter(|entry| !options.is_excluded(&entry.name))
        .filter(|entry| entry.inclusive_ms > SIGNIFICANCE_FLOOR_MS)
        .map(|entry| OnlyEntry {
            name: entry.name.clone(),
            exclusive_ms: entry.exclusive_ms,
            inclusive_ms: entry.inclusive_ms,
        })
        .collect();
    entries.sort_by(|a, b| b.inclusive_ms.total_cmp(&a.inclusive_ms));
    entries
}
