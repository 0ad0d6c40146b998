//! core::matcher
//!
//! Branch-name pattern matching.
//!
//! # Semantics
//!
//! A branch name is valid if it matches **at least one** configured pattern.
//! Matching is an unanchored search, so policies normally anchor their
//! patterns (`^feature/.+`). An empty pattern set accepts nothing.
//!
//! Every pattern is evaluated and its outcome logged, even after a match has
//! been found, so the run log shows the full picture for each branch. The
//! first matching pattern (in configured order) is the one reported.
//!
//! Patterns are compiled one at a time in order. The first pattern that does
//! not compile aborts the check with [`PolicyError::PatternSyntax`]; patterns
//! before it have already been evaluated and logged.
//!
//! Syntax is that of the [`regex`] crate, which has no look-around or
//! backreferences.

use regex::Regex;

use super::error::PolicyError;
use crate::ui::Reporter;

/// Outcome of matching a branch name against the policy patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Whether any pattern matched.
    pub is_valid: bool,
    /// The first pattern that matched.
    pub matched_pattern: Option<String>,
}

impl ValidationResult {
    fn from_first_match(matched_pattern: Option<String>) -> Self {
        Self {
            is_valid: matched_pattern.is_some(),
            matched_pattern,
        }
    }
}

/// Compile a single pattern.
///
/// # Errors
///
/// Returns `PolicyError::PatternSyntax` if the pattern is not a valid regex.
pub fn compile(pattern: &str) -> Result<Regex, PolicyError> {
    Regex::new(pattern).map_err(|source| PolicyError::PatternSyntax {
        pattern: pattern.to_string(),
        source,
    })
}

/// Match `branch` against every pattern.
///
/// # Errors
///
/// Returns `PolicyError::PatternSyntax` for the first pattern that does not
/// compile.
///
/// # Example
///
/// ```
/// use branchpolicy::core::matcher::validate;
/// use branchpolicy::ui::MemoryReporter;
///
/// let patterns = vec!["^feature/.+".to_string(), "^hotfix/.+".to_string()];
/// let result = validate(&patterns, "hotfix/crash", &MemoryReporter::new()).unwrap();
///
/// assert!(result.is_valid);
/// assert_eq!(result.matched_pattern.as_deref(), Some("^hotfix/.+"));
/// ```
pub fn validate(
    patterns: &[String],
    branch: &str,
    reporter: &dyn Reporter,
) -> Result<ValidationResult, PolicyError> {
    reporter.debug("Validating branch name against patterns");
    let mut first_match: Option<String> = None;

    for pattern in patterns {
        reporter.info(&format!("Validating '{}' against '{}'", branch, pattern));
        let regex = match compile(pattern) {
            Ok(regex) => regex,
            Err(err) => {
                reporter.error(&err.to_string());
                reporter.error("Pattern validation aborted; fix the configured patterns.");
                return Err(err);
            }
        };

        if regex.is_match(branch) {
            reporter.info("Match.");
            first_match.get_or_insert_with(|| pattern.clone());
        } else {
            reporter.info("Not a match.");
        }
    }

    let result = ValidationResult::from_first_match(first_match);
    if result.is_valid {
        reporter.info("Branch matched at least one pattern.");
        reporter.info("Branch name is valid.");
    } else {
        reporter.warning("Branch did not match any of the allowed patterns.");
        reporter.warning("Please refer to the branch naming policy for your project.");
    }
    Ok(result)
}
