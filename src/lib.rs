//! `pprof_compare` - compare two pprof CPU profiles.
//!
//! The pipeline is: extract each profile to `-top` text, parse it into a
//! [`model::CostTable`], diff the two tables under a tolerance policy, and
//! render a ranked report grouped by code-ownership category.

pub mod classify;
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod format;
pub mod logging;
pub mod model;
pub mod profile;
pub mod report;
pub mod util;

pub use error::{CompareError, ErrorCode, Result, StructuredError};
