//! core::config
//!
//! Policy configuration and loading.
//!
//! # Overview
//!
//! The policy is read once at start and never changes during a run. It comes
//! from two sources:
//! - **Inputs**: the hook's raw string inputs (`ignore_branches`, `regex`,
//!   `delete_branch`), as the CI host provides them
//! - **Policy file**: an optional TOML file (see [`schema`])
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values (no ignores, no patterns, no deletion)
//! 2. Policy file
//! 3. Inputs
//!
//! # Input Format
//!
//! List inputs are `;`-delimited. Entries are trimmed and empty entries are
//! dropped, so `"main; develop;"` is `["main", "develop"]`. Deletion is on
//! only for the exact string `true`.
//!
//! # Example
//!
//! ```
//! use branchpolicy::core::config::{PolicyConfig, PolicyInputs};
//!
//! let inputs = PolicyInputs {
//!     ignore_branches: Some("main;develop".into()),
//!     regex: Some("^feature/.+;^hotfix/.+".into()),
//!     delete_branch: Some("true".into()),
//! };
//! let config = PolicyConfig::resolve(None, &inputs);
//!
//! assert!(config.ignore_list().contains("main"));
//! assert_eq!(config.patterns().len(), 2);
//! assert!(config.delete_on_violation());
//! ```

pub mod schema;

pub use schema::{PolicyFile, PolicySection};

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Delimiter for list-valued inputs.
pub const LIST_DELIMITER: char = ';';

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Raw hook inputs, exactly as the host hands them over.
///
/// `None` means the input was not provided at all, which lets a policy file
/// value show through. An empty string is a provided-but-empty input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyInputs {
    /// `;`-delimited branch names exempt from validation
    pub ignore_branches: Option<String>,
    /// `;`-delimited acceptable patterns
    pub regex: Option<String>,
    /// `"true"` enables deletion of violating branches
    pub delete_branch: Option<String>,
}

/// Immutable naming policy for a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyConfig {
    ignore_list: BTreeSet<String>,
    patterns: Vec<String>,
    delete_on_violation: bool,
}

impl PolicyConfig {
    /// Build a policy from already-parsed values.
    pub fn new<I, P>(ignore_list: I, patterns: P, delete_on_violation: bool) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            ignore_list: ignore_list.into_iter().map(Into::into).collect(),
            patterns: patterns.into_iter().map(Into::into).collect(),
            delete_on_violation,
        }
    }

    /// Resolve the policy from an optional policy file and the raw inputs.
    ///
    /// Inputs that were provided override the corresponding file value.
    pub fn resolve(file: Option<&PolicyFile>, inputs: &PolicyInputs) -> Self {
        let section = file.and_then(|f| f.policy.clone()).unwrap_or_default();

        let ignore_list: Vec<String> = match &inputs.ignore_branches {
            Some(raw) => split_list(raw),
            None => section.ignore_branches.unwrap_or_default(),
        };

        let patterns: Vec<String> = match &inputs.regex {
            Some(raw) => split_list(raw),
            None => section.patterns.unwrap_or_default(),
        };

        let delete_on_violation = match &inputs.delete_branch {
            Some(raw) => parse_flag(raw),
            None => section.delete_branch.unwrap_or(false),
        };

        log::debug!(
            "resolved policy: {} ignored branch(es), {} pattern(s), delete={}",
            ignore_list.len(),
            patterns.len(),
            delete_on_violation
        );

        Self::new(ignore_list, patterns, delete_on_violation)
    }

    /// Load a policy file and resolve it against the inputs.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is given but cannot be read, parsed, or
    /// validated.
    pub fn load(path: Option<&Path>, inputs: &PolicyInputs) -> Result<Self, ConfigError> {
        let file = path.map(read_policy_file).transpose()?;
        Ok(Self::resolve(file.as_ref(), inputs))
    }

    /// Branch names exempt from validation.
    pub fn ignore_list(&self) -> &BTreeSet<String> {
        &self.ignore_list
    }

    /// Acceptable patterns, in configured order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Whether violating branches are deleted.
    pub fn delete_on_violation(&self) -> bool {
        self.delete_on_violation
    }
}

/// Split a `;`-delimited input into trimmed, non-empty entries.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(LIST_DELIMITER)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(String::from)
        .collect()
}

/// Interpret a boolean input. Only the exact string `true` is on.
pub fn parse_flag(raw: &str) -> bool {
    raw == "true"
}

/// Read, parse and validate a policy file.
fn read_policy_file(path: &Path) -> Result<PolicyFile, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let file: PolicyFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    file.validate()?;
    log::debug!("loaded policy file {}", path.display());
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn inputs(ignore: Option<&str>, regex: Option<&str>, delete: Option<&str>) -> PolicyInputs {
        PolicyInputs {
            ignore_branches: ignore.map(String::from),
            regex: regex.map(String::from),
            delete_branch: delete.map(String::from),
        }
    }

    mod split_list {
        use super::*;

        #[test]
        fn splits_on_semicolon() {
            assert_eq!(split_list("a;b;c"), vec!["a", "b", "c"]);
        }

        #[test]
        fn trims_and_drops_empty() {
            assert_eq!(split_list(" main ; develop;;"), vec!["main", "develop"]);
            assert!(split_list("").is_empty());
            assert!(split_list(" ; ").is_empty());
        }

        #[test]
        fn keeps_regex_metacharacters() {
            assert_eq!(split_list("^feature/.+$"), vec!["^feature/.+$"]);
        }
    }

    #[test]
    fn parse_flag_is_exact() {
        assert!(parse_flag("true"));
        assert!(!parse_flag("True"));
        assert!(!parse_flag("yes"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn resolve_from_inputs() {
        let config = PolicyConfig::resolve(
            None,
            &inputs(Some("main"), Some("^feature/.+;^hotfix/.+"), Some("false")),
        );
        assert!(config.ignore_list().contains("main"));
        assert_eq!(config.patterns(), &["^feature/.+", "^hotfix/.+"]);
        assert!(!config.delete_on_violation());
    }

    #[test]
    fn resolve_defaults() {
        let config = PolicyConfig::resolve(None, &PolicyInputs::default());
        assert_eq!(config, PolicyConfig::default());
    }

    #[test]
    fn inputs_override_file() {
        let file = PolicyFile {
            policy: Some(PolicySection {
                ignore_branches: Some(vec!["develop".into()]),
                patterns: Some(vec!["^release/.+".into()]),
                delete_branch: Some(true),
            }),
        };

        let config = PolicyConfig::resolve(Some(&file), &inputs(None, Some("^feature/.+"), None));
        assert!(config.ignore_list().contains("develop"));
        assert_eq!(config.patterns(), &["^feature/.+"]);
        assert!(config.delete_on_violation());

        let config = PolicyConfig::resolve(Some(&file), &inputs(Some(""), None, Some("no")));
        assert!(config.ignore_list().is_empty());
        assert_eq!(config.patterns(), &["^release/.+"]);
        assert!(!config.delete_on_violation());
    }

    #[test]
    fn new_deduplicates_ignores_and_keeps_pattern_order() {
        let config = PolicyConfig::new(["main", "main"], ["^b", "^a", "^b"], true);
        assert_eq!(config.ignore_list().len(), 1);
        assert_eq!(config.patterns(), &["^b", "^a", "^b"]);
    }

    #[test]
    fn load_reads_policy_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("branch-policy.toml");
        fs::write(
            &path,
            "[policy]\nignore_branches = [\"main\"]\npatterns = [\"^feature/.+\"]\n",
        )
        .unwrap();

        let config = PolicyConfig::load(Some(&path), &PolicyInputs::default()).unwrap();
        assert!(config.ignore_list().contains("main"));
        assert_eq!(config.patterns(), &["^feature/.+"]);
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.toml");
        let result = PolicyConfig::load(Some(&path), &PolicyInputs::default());
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn load_invalid_toml_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[policy\n").unwrap();
        let result = PolicyConfig::load(Some(&path), &PolicyInputs::default());
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }
}
