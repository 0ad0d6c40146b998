//! core::config::schema
//!
//! Policy file schema.
//!
//! A policy file lets a repository keep its naming rules in version control
//! instead of inlining them in the workflow definition. Values from explicit
//! inputs override the file.
//!
//! # Validation
//!
//! Entries are validated after parsing: ignore-list entries and patterns
//! must not be empty strings. Pattern syntax is *not* checked here; that is
//! the matcher's job, so a bad pattern fails the run the same way no matter
//! where it was configured.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Top-level policy file.
///
/// # Example
///
/// ```toml
/// [policy]
/// ignore_branches = ["main", "develop"]
/// patterns = ["^feature/.+", "^hotfix/.+"]
/// delete_branch = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyFile {
    /// Naming policy section
    pub policy: Option<PolicySection>,
}

impl PolicyFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(policy) = &self.policy {
            policy.validate()?;
        }
        Ok(())
    }
}

/// The `[policy]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PolicySection {
    /// Branch names exempt from validation
    pub ignore_branches: Option<Vec<String>>,

    /// Acceptable branch-name patterns
    pub patterns: Option<Vec<String>>,

    /// Delete branches that violate the policy
    pub delete_branch: Option<bool>,
}

impl PolicySection {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ignores) = &self.ignore_branches {
            if ignores.iter().any(|b| b.trim().is_empty()) {
                return Err(ConfigError::InvalidValue(
                    "ignore_branches entries cannot be empty".into(),
                ));
            }
        }

        if let Some(patterns) = &self.patterns {
            if patterns.iter().any(|p| p.trim().is_empty()) {
                return Err(ConfigError::InvalidValue(
                    "patterns entries cannot be empty".into(),
                ));
            }
        }

        Ok(())
    }
}
