//! core::error
//!
//! Terminal errors of a policy run.
//!
//! Every variant fails the run. Skips and passes are not errors; they are
//! reported through [`crate::core::policy::Verdict`].

use thiserror::Error;

use super::config::ConfigError;
use super::event::EventError;
use crate::forge::ForgeError;

/// Errors that end a policy run with a failure.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The hook was triggered by something other than a `create` event.
    #[error("invalid event '{event}' (ref type: {}); only 'create' events are supported", .ref_type.as_deref().unwrap_or("none"))]
    InvalidEvent {
        event: String,
        ref_type: Option<String>,
    },

    /// A configured pattern is not a valid regular expression.
    #[error("invalid branch pattern '{pattern}': {source}")]
    PatternSyntax {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The remote delete-ref call failed.
    #[error("failed to delete branch '{branch}': {source}")]
    Deletion {
        branch: String,
        #[source]
        source: ForgeError,
    },

    /// The branch name matched none of the configured patterns.
    #[error("branch '{branch}' did not pass naming rules policy")]
    ValidationFailure { branch: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Event(#[from] EventError),
}

impl PolicyError {
    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            PolicyError::InvalidEvent { .. } => "invalid_event",
            PolicyError::PatternSyntax { .. } => "pattern_syntax",
            PolicyError::Deletion { .. } => "deletion",
            PolicyError::ValidationFailure { .. } => "validation_failure",
            PolicyError::Config(_) => "config",
            PolicyError::Event(_) => "event",
        }
    }
}
