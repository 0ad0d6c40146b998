//! ui
//!
//! Run log output.
//!
//! # Modules
//!
//! - [`output`] - Reporter trait and its Actions / in-memory implementations
//!
//! # Design
//!
//! All run output goes through a [`output::Reporter`] handed to each
//! component, so the log format is decided in one place and tests can
//! inspect what a run reported.

pub mod output;

pub use output::{ActionsReporter, Level, MemoryReporter, Reporter, Verbosity};
