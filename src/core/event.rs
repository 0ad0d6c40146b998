//! core::event
//!
//! The triggering event and the event gate.
//!
//! # Sources
//!
//! An [`Event`] is assembled once per run from the CI host:
//! - the event name (`GITHUB_EVENT_NAME`)
//! - the full ref of the created branch (`GITHUB_REF`)
//! - the repository slug `owner/name` (`GITHUB_REPOSITORY`)
//! - the JSON event payload (`GITHUB_EVENT_PATH`), which supplies the ref
//!   type and acts as fallback for the ref and repository
//!
//! The payload's `ref` field holds the *short* name on `create` events, so it
//! is expanded to a full ref using the ref type when no full ref is given.
//! Without a payload ref type, the type is read off the full ref instead
//! (`refs/heads/` is a branch, `refs/tags/` a tag).
//!
//! # Gate
//!
//! [`check_event`] accepts only `create` events. A `create` of anything but a
//! branch (a tag) is skipped; every other event is an error, since the hook
//! was wired to the wrong trigger.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::error::PolicyError;
use crate::ui::Reporter;

/// Event name for ref creation.
pub const CREATE_EVENT: &str = "create";

/// Ref type of a created branch.
pub const BRANCH_REF_TYPE: &str = "branch";

/// Ref type of a created tag.
pub const TAG_REF_TYPE: &str = "tag";

/// Prefix of every branch ref.
pub const HEADS_PREFIX: &str = "refs/heads/";

/// Prefix of every tag ref.
pub const TAGS_PREFIX: &str = "refs/tags/";

/// Errors from reading the event.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("failed to read event payload '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse event payload: {0}")]
    ParseError(String),

    #[error("invalid repository '{0}', expected 'owner/name'")]
    InvalidRepository(String),

    #[error("event is missing the created ref")]
    MissingRef,

    #[error("event is missing the repository owner and name")]
    MissingRepository,
}

/// The event that triggered the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    /// Event name (e.g., "create", "push")
    pub name: String,
    /// Type of the created ref ("branch" or "tag"), if the event has one
    pub ref_type: Option<String>,
    /// Full ref path (e.g., "refs/heads/feature/login")
    pub git_ref: String,
    /// Repository owner (user or organization)
    pub repo_owner: String,
    /// Repository name
    pub repo_name: String,
}

impl Event {
    /// Create a `create`/`branch` event for the given ref.
    pub fn branch_created(
        git_ref: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self {
            name: CREATE_EVENT.to_string(),
            ref_type: Some(BRANCH_REF_TYPE.to_string()),
            git_ref: git_ref.into(),
            repo_owner: owner.into(),
            repo_name: repo.into(),
        }
    }

    /// The branch name carried by this event's ref.
    pub fn branch_name(&self) -> &str {
        branch_name(&self.git_ref)
    }

    /// Owner and name of the repository, when both are known.
    pub fn repository(&self) -> Result<(&str, &str), EventError> {
        if self.repo_owner.is_empty() || self.repo_name.is_empty() {
            return Err(EventError::MissingRepository);
        }
        Ok((&self.repo_owner, &self.repo_name))
    }
}

/// Where to read the event from.
#[derive(Debug, Clone, Default)]
pub struct EventSource {
    /// Event name
    pub name: String,
    /// Full ref, if the host provides it separately from the payload
    pub git_ref: Option<String>,
    /// Repository slug `owner/name`
    pub repository: Option<String>,
    /// Path to the JSON event payload
    pub payload_path: Option<PathBuf>,
}

impl EventSource {
    /// Read the payload (if any) and assemble the event.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be read or parsed, or if the
    /// repository slug is malformed.
    pub fn load(&self) -> Result<Event, EventError> {
        let payload = match &self.payload_path {
            Some(path) => Some(read_payload(path)?),
            None => None,
        };
        self.resolve(payload.as_deref())
    }

    /// Assemble the event from an already-read payload.
    pub fn resolve(&self, payload: Option<&str>) -> Result<Event, EventError> {
        let payload: EventPayload = match payload {
            Some(raw) if !raw.trim().is_empty() => {
                serde_json::from_str(raw).map_err(|e| EventError::ParseError(e.to_string()))?
            }
            _ => EventPayload::default(),
        };

        let git_ref = match &self.git_ref {
            Some(full) if !full.trim().is_empty() => full.trim().to_string(),
            _ => payload
                .git_ref
                .as_deref()
                .map(|short| full_ref(short.trim(), payload.ref_type.as_deref()))
                .unwrap_or_default(),
        };

        let (repo_owner, repo_name) = match &self.repository {
            Some(slug) if !slug.trim().is_empty() => split_repository(slug)?,
            _ => payload
                .repository
                .map(|r| (r.owner.login.trim().to_string(), r.name.trim().to_string()))
                .unwrap_or_default(),
        };

        let ref_type = payload
            .ref_type
            .or_else(|| ref_type_of(&git_ref).map(String::from));

        Ok(Event {
            name: self.name.trim().to_string(),
            ref_type,
            git_ref,
            repo_owner,
            repo_name,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct EventPayload {
    #[serde(rename = "ref")]
    git_ref: Option<String>,
    ref_type: Option<String>,
    repository: Option<PayloadRepository>,
}

#[derive(Debug, Deserialize)]
struct PayloadRepository {
    name: String,
    owner: PayloadOwner,
}

#[derive(Debug, Deserialize)]
struct PayloadOwner {
    login: String,
}

fn read_payload(path: &Path) -> Result<String, EventError> {
    log::debug!("reading event payload from {}", path.display());
    fs::read_to_string(path).map_err(|e| EventError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Expand a payload ref to a full ref path.
fn full_ref(git_ref: &str, ref_type: Option<&str>) -> String {
    if git_ref.starts_with("refs/") {
        return git_ref.to_string();
    }
    match ref_type {
        Some(TAG_REF_TYPE) => format!("{}{}", TAGS_PREFIX, git_ref),
        Some(BRANCH_REF_TYPE) => format!("{}{}", HEADS_PREFIX, git_ref),
        _ => git_ref.to_string(),
    }
}

/// Ref type implied by a full ref path.
fn ref_type_of(git_ref: &str) -> Option<&'static str> {
    if git_ref.starts_with(HEADS_PREFIX) {
        Some(BRANCH_REF_TYPE)
    } else if git_ref.starts_with(TAGS_PREFIX) {
        Some(TAG_REF_TYPE)
    } else {
        None
    }
}

fn split_repository(slug: &str) -> Result<(String, String), EventError> {
    match slug.trim().split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner.to_string(), name.to_string()))
        }
        _ => Err(EventError::InvalidRepository(slug.to_string())),
    }
}

/// Extract the branch name from a ref: everything after the last
/// `refs/heads/`, or the whole ref when it has no such prefix.
///
/// # Example
///
/// ```
/// use branchpolicy::core::event::branch_name;
///
/// assert_eq!(branch_name("refs/heads/feature/login"), "feature/login");
/// assert_eq!(branch_name("feature/login"), "feature/login");
/// ```
pub fn branch_name(git_ref: &str) -> &str {
    git_ref.rsplit(HEADS_PREFIX).next().unwrap_or(git_ref)
}

/// Decide whether the run should proceed for this event.
///
/// Returns `Ok(true)` for a created branch, `Ok(false)` for any other
/// created ref (tags).
///
/// # Errors
///
/// Returns `PolicyError::InvalidEvent` when the event is not `create`.
pub fn check_event(event: &Event, reporter: &dyn Reporter) -> Result<bool, PolicyError> {
    reporter.debug("Checking triggering event");
    let ref_type = event.ref_type.as_deref().unwrap_or("");

    if event.name == CREATE_EVENT {
        reporter.info(&format!(
            "eventName='{}' and eventType='{}'",
            event.name, ref_type
        ));
        if ref_type == BRANCH_REF_TYPE {
            reporter.info("Valid event for execution.");
            return Ok(true);
        }
        reporter.info("Created ref is not a branch.");
        return Ok(false);
    }

    reporter.warning(&format!(
        "eventName='{}' and eventType='{}'",
        event.name, ref_type
    ));
    reporter.warning("This hook only runs on 'create' 'branch' events.");
    reporter.warning("Adjust the workflow triggers to 'create'.");
    Err(PolicyError::InvalidEvent {
        event: event.name.clone(),
        ref_type: event.ref_type.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{Level, MemoryReporter};

    fn event(name: &str, ref_type: Option<&str>) -> Event {
        Event {
            name: name.to_string(),
            ref_type: ref_type.map(String::from),
            git_ref: "refs/heads/feature/x".to_string(),
            repo_owner: "octocat".to_string(),
            repo_name: "hello-world".to_string(),
        }
    }

    mod branch_name {
        use super::*;

        #[test]
        fn strips_heads_prefix() {
            assert_eq!(branch_name("refs/heads/feature/login"), "feature/login");
            assert_eq!(branch_name("refs/heads/main"), "main");
        }

        #[test]
        fn keeps_plain_name() {
            assert_eq!(branch_name("main"), "main");
            assert_eq!(branch_name(""), "");
        }

        #[test]
        fn uses_last_occurrence() {
            assert_eq!(branch_name("refs/heads/a/refs/heads/b"), "b");
        }

        #[test]
        fn leaves_tag_refs_alone() {
            assert_eq!(branch_name("refs/tags/v1.0"), "refs/tags/v1.0");
        }
    }

    mod gate {
        use super::*;

        #[test]
        fn create_branch_proceeds() {
            let reporter = MemoryReporter::new();
            assert!(check_event(&event("create", Some("branch")), &reporter).unwrap());
            assert!(reporter.contains("Valid event for execution."));
        }

        #[test]
        fn create_tag_skips() {
            let reporter = MemoryReporter::new();
            assert!(!check_event(&event("create", Some("tag")), &reporter).unwrap());
            assert!(reporter.messages(Level::Warning).is_empty());
        }

        #[test]
        fn other_events_fail() {
            let reporter = MemoryReporter::new();
            let err = check_event(&event("push", None), &reporter).unwrap_err();
            assert!(matches!(err, PolicyError::InvalidEvent { ref event, .. } if event == "push"));
            assert_eq!(reporter.messages(Level::Warning).len(), 3);
        }

        #[test]
        fn event_name_is_case_sensitive() {
            let reporter = MemoryReporter::new();
            assert!(check_event(&event("Create", Some("branch")), &reporter).is_err());
        }
    }

    mod source {
        use super::*;

        const CREATE_PAYLOAD: &str = r#"{
            "ref": "feature/login",
            "ref_type": "branch",
            "master_branch": "main",
            "repository": {
                "name": "hello-world",
                "owner": { "login": "octocat" }
            }
        }"#;

        #[test]
        fn resolves_from_payload() {
            let source = EventSource {
                name: "create".into(),
                ..Default::default()
            };
            let event = source.resolve(Some(CREATE_PAYLOAD)).unwrap();
            assert_eq!(event.name, "create");
            assert_eq!(event.ref_type.as_deref(), Some("branch"));
            assert_eq!(event.git_ref, "refs/heads/feature/login");
            assert_eq!(event.branch_name(), "feature/login");
            assert_eq!(event.repo_owner, "octocat");
            assert_eq!(event.repo_name, "hello-world");
        }

        #[test]
        fn explicit_values_win() {
            let source = EventSource {
                name: "create".into(),
                git_ref: Some(" refs/heads/hotfix/1 ".into()),
                repository: Some("acme/widgets".into()),
                payload_path: None,
            };
            let event = source.resolve(Some(CREATE_PAYLOAD)).unwrap();
            assert_eq!(event.git_ref, "refs/heads/hotfix/1");
            assert_eq!(event.repo_owner, "acme");
            assert_eq!(event.repo_name, "widgets");
        }

        #[test]
        fn tag_payload_expands_to_tag_ref() {
            let source = EventSource {
                name: "create".into(),
                ..Default::default()
            };
            let event = source
                .resolve(Some(r#"{"ref": "v1.0", "ref_type": "tag"}"#))
                .unwrap();
            assert_eq!(event.git_ref, "refs/tags/v1.0");
        }

        #[test]
        fn ref_type_follows_full_ref_without_payload() {
            let source = EventSource {
                name: "create".into(),
                git_ref: Some("refs/heads/random".into()),
                ..Default::default()
            };
            let event = source.resolve(None).unwrap();
            assert_eq!(event.ref_type.as_deref(), Some("branch"));
            assert!(check_event(&event, &MemoryReporter::new()).unwrap());

            let source = EventSource {
                git_ref: Some("refs/tags/v2".into()),
                ..source
            };
            assert_eq!(source.resolve(None).unwrap().ref_type.as_deref(), Some("tag"));
        }

        #[test]
        fn payload_ref_type_wins_over_full_ref() {
            let source = EventSource {
                name: "create".into(),
                git_ref: Some("refs/heads/v1.0".into()),
                ..Default::default()
            };
            let event = source
                .resolve(Some(r#"{"ref": "v1.0", "ref_type": "tag"}"#))
                .unwrap();
            assert_eq!(event.ref_type.as_deref(), Some("tag"));
        }

        #[test]
        fn repository_requires_owner_and_name() {
            let source = EventSource {
                name: "create".into(),
                ..Default::default()
            };
            let event = source
                .resolve(Some(r#"{"ref": "bad", "ref_type": "branch"}"#))
                .unwrap();
            assert!(matches!(
                event.repository(),
                Err(EventError::MissingRepository)
            ));

            let event = Event::branch_created("refs/heads/bad", "octocat", "hello");
            assert_eq!(event.repository().unwrap(), ("octocat", "hello"));
        }

        #[test]
        fn missing_payload_yields_empty_fields() {
            let source = EventSource {
                name: "push".into(),
                ..Default::default()
            };
            let event = source.resolve(None).unwrap();
            assert!(event.ref_type.is_none());
            assert!(event.git_ref.is_empty());
        }

        #[test]
        fn malformed_payload_fails() {
            let source = EventSource::default();
            assert!(matches!(
                source.resolve(Some("{not json")),
                Err(EventError::ParseError(_))
            ));
        }

        #[test]
        fn malformed_repository_fails() {
            for slug in ["nope", "/repo", "owner/", "a/b/c"] {
                let source = EventSource {
                    name: "create".into(),
                    repository: Some(slug.into()),
                    ..Default::default()
                };
                assert!(
                    matches!(source.resolve(None), Err(EventError::InvalidRepository(_))),
                    "slug {slug:?} should be rejected"
                );
            }
        }

        #[test]
        fn load_reads_payload_file() {
            let dir = tempfile::TempDir::new().unwrap();
            let path = dir.path().join("event.json");
            std::fs::write(&path, CREATE_PAYLOAD).unwrap();

            let source = EventSource {
                name: "create".into(),
                payload_path: Some(path),
                ..Default::default()
            };
            assert_eq!(source.load().unwrap().branch_name(), "feature/login");
        }

        #[test]
        fn load_missing_file_fails() {
            let source = EventSource {
                name: "create".into(),
                payload_path: Some(PathBuf::from("/nonexistent/event.json")),
                ..Default::default()
            };
            assert!(matches!(source.load(), Err(EventError::ReadError { .. })));
        }
    }
}
