//! core::deleter
//!
//! Branch deletion through the forge.
//!
//! The forge API addresses refs without the leading `refs/`
//! (`heads/feature`), so the full ref from the event is shortened before the
//! call. Failures are wrapped once into [`PolicyError::Deletion`] and never
//! retried.

use super::error::PolicyError;
use super::event::branch_name;
use crate::forge::Forge;
use crate::ui::Reporter;

/// Strip the leading `refs/` from a full ref.
///
/// # Example
///
/// ```
/// use branchpolicy::core::deleter::ref_path;
///
/// assert_eq!(ref_path("refs/heads/bad-branch"), "heads/bad-branch");
/// ```
pub fn ref_path(git_ref: &str) -> &str {
    git_ref.strip_prefix("refs/").unwrap_or(git_ref)
}

/// Delete `git_ref` from `owner/repo`.
///
/// # Errors
///
/// Returns `PolicyError::Deletion` wrapping the forge error on any failure.
pub async fn delete_branch(
    forge: &dyn Forge,
    owner: &str,
    repo: &str,
    git_ref: &str,
    reporter: &dyn Reporter,
) -> Result<(), PolicyError> {
    let path = ref_path(git_ref);
    reporter.debug(&format!("Deleting through {}", forge.name()));
    reporter.warning(&format!("Deleting a branch: {}/{}/{}", owner, repo, path));

    forge
        .delete_ref(owner, repo, path)
        .await
        .map_err(|source| {
            reporter.error(&format!("Branch deletion failed: {}", source));
            PolicyError::Deletion {
                branch: branch_name(git_ref).to_string(),
                source,
            }
        })
}
