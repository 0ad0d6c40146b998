//! core
//!
//! Branch naming policy: configuration, event, and the run components.
//!
//! # Modules
//!
//! - [`config`] - Policy configuration schema and loading
//! - [`event`] - Triggering event and the event gate
//! - [`ignore`] - Ignore-list filter
//! - [`matcher`] - Pattern matching
//! - [`deleter`] - Branch deletion through the forge
//! - [`policy`] - Orchestration of a single run
//! - [`error`] - Terminal run errors
//!
//! # Design Principles
//!
//! - Configuration is immutable once a run starts
//! - Every component logs through an injected reporter
//! - Decisions are values; errors are reserved for failed runs

pub mod config;
pub mod deleter;
pub mod error;
pub mod event;
pub mod ignore;
pub mod matcher;
pub mod policy;

pub use error::PolicyError;
