//! Core data types for `pprof_compare`.
//!
//! This module defines the values that flow through the pipeline:
//! - `CostEntry` / `CostTable` - One run's parsed per-function costs
//! - `Category` - Ownership bucket for a function
//! - `Classification` - Regression / improvement / stable verdict
//! - `ComparisonEntry` - One function's cross-run deltas
//! - `ComparisonResult` - Everything the renderer needs
//!
//! Nothing here is mutated after construction.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// One function's measured cost within a single run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostEntry {
    pub name: String,
    /// Flat time, callees excluded.
    pub exclusive_ms: f64,
    /// Cumulative time, callees included. Expected `>= exclusive_ms`, not enforced.
    pub inclusive_ms: f64,
}

impl CostEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, exclusive_ms: f64, inclusive_ms: f64) -> Self {
        Self {
            name: name.into(),
            exclusive_ms,
            inclusive_ms,
        }
    }
}

/// The parsed result of one profile report.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostTable {
    /// Function name to cost. Case-sensitive, no normalization.
    pub entries: BTreeMap<String, CostEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_sampled_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_s: Option<f64>,
}

impl CostTable {
    /// Build a table from entries; a repeated name keeps the last entry.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = CostEntry>) -> Self {
        let mut table = Self::default();
        for entry in entries {
            table.entries.insert(entry.name.clone(), entry);
        }
        table
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CostEntry> {
        self.entries.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Logical ownership bucket for a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    YourCode,
    Runtime,
    ThirdPartyUi,
    EntityFramework,
    Other,
}

impl Category {
    /// Order in which report sections are shown: own code before framework noise.
    pub const DISPLAY_ORDER: [Self; 5] = [
        Self::YourCode,
        Self::EntityFramework,
        Self::Runtime,
        Self::ThirdPartyUi,
        Self::Other,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::YourCode => "YOUR_CODE",
            Self::Runtime => "RUNTIME",
            Self::ThirdPartyUi => "THIRD_PARTY_UI",
            Self::EntityFramework => "ENTITY_FRAMEWORK",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict for a function present in both runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Regression,
    Improvement,
    Stable,
}

/// One function's cross-run comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonEntry {
    pub name: String,
    pub category: Category,
    pub old_exclusive_ms: f64,
    pub new_exclusive_ms: f64,
    pub exclusive_delta_ms: f64,
    pub exclusive_pct_change: f64,
    pub old_inclusive_ms: f64,
    pub new_inclusive_ms: f64,
    pub inclusive_delta_ms: f64,
    pub inclusive_pct_change: f64,
}

/// A function seen in only one of the two runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OnlyEntry {
    pub name: String,
    pub exclusive_ms: f64,
    pub inclusive_ms: f64,
}

/// Output of the diff engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonResult {
    /// Sorted by inclusive delta, largest first.
    pub regressions: Vec<ComparisonEntry>,
    /// Sorted by inclusive delta, most negative first.
    pub improvements: Vec<ComparisonEntry>,
    pub stable: Vec<ComparisonEntry>,
    /// Candidate-only functions above the significance floor.
    pub new_only: Vec<OnlyEntry>,
    /// Baseline-only functions above the significance floor.
    pub removed_only: Vec<OnlyEntry>,
    pub excluded_count: usize,
    pub common_count: usize,
}

impl ComparisonResult {
    /// Regressions belonging to one category, in engine order.
    pub fn regressions_in(&self, category: Category) -> impl Iterator<Item = &ComparisonEntry> {
        self.regressions
            .iter()
            .filter(move |entry| entry.category == category)
    }

    /// Improvements belonging to one category, in engine order.
    pub fn improvements_in(&self, category: Category) -> impl Iterator<Item = &ComparisonEntry> {
        self.improvements
            .iter()
            .filter(move |entry| entry.category == category)
    }
}
