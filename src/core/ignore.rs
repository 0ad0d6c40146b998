//! core::ignore
//!
//! Ignore-list filter.
//!
//! Branches on the ignore list (typically long-lived branches such as
//! `main` or `develop`) bypass naming enforcement entirely. Membership is an
//! exact, case-sensitive string comparison.

use std::collections::BTreeSet;

use crate::ui::Reporter;

/// Whether `branch` is exempt from naming enforcement.
pub fn should_ignore(ignore_list: &BTreeSet<String>, branch: &str, reporter: &dyn Reporter) -> bool {
    reporter.debug("Checking ignore list");
    let listed = ignore_list
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    reporter.info(&format!("Branches that should be ignored: {}", listed));

    if ignore_list.contains(branch) {
        reporter.info("Current branch is in ignore list.");
        return true;
    }
    reporter.info("Current branch is not in ignore list.");
    false
}
