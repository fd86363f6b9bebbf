//! Shared utilities for `pprof_compare`.
//!
//! - Progress indicators (for profile extraction)

pub mod progress;

pub use progress::{ProgressMode, StepProgress, create_spinner, should_show_progress};
