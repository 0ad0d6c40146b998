//! End-to-end policy scenarios using MockForge.
//!
//! Each test builds a configuration the way the CLI does (from raw `;`-list
//! inputs) and runs the full policy against a created-branch event.

use branchpolicy::core::config::{PolicyConfig, PolicyInputs};
use branchpolicy::core::event::{Event, EventSource};
use branchpolicy::core::policy::{enforce, Deletion, PolicyRunner, Verdict};
use branchpolicy::core::PolicyError;
use branchpolicy::forge::mock::{FailOn, MockForge, MockOperation};
use branchpolicy::forge::ForgeError;
use branchpolicy::ui::{Level, MemoryReporter};

fn config(ignore: &str, regex: &str, delete: &str) -> PolicyConfig {
    PolicyConfig::resolve(
        None,
        &PolicyInputs {
            ignore_branches: Some(ignore.to_string()),
            regex: Some(regex.to_string()),
            delete_branch: Some(delete.to_string()),
        },
    )
}

fn created(branch: &str) -> Event {
    Event::branch_created(format!("refs/heads/{}", branch), "octocat", "hello-world")
}

#[tokio::test]
async fn valid_branch_passes_without_deletion() {
    let config = config("", "^feature/.+;^hotfix/.+", "true");
    let forge = MockForge::new();
    let reporter = MemoryReporter::new();

    let verdict = enforce(&config, &created("feature/xyz"), &forge, &reporter)
        .await
        .unwrap();

    assert!(verdict.is_success());
    assert_eq!(verdict.branch(), Some("feature/xyz"));
    assert!(forge.operations().is_empty());
    assert!(reporter.messages(Level::Error).is_empty());
}

#[tokio::test]
async fn invalid_branch_is_deleted_and_still_fails() {
    let config = config("", "^feature/.+", "true");
    let forge = MockForge::new();
    let reporter = MemoryReporter::new();

    let result = enforce(&config, &created("random"), &forge, &reporter).await;

    assert!(matches!(
        result,
        Err(PolicyError::ValidationFailure { ref branch }) if branch == "random"
    ));
    assert_eq!(
        forge.operations(),
        vec![MockOperation::DeleteRef {
            owner: "octocat".into(),
            repo: "hello-world".into(),
            ref_path: "heads/random".into(),
        }]
    );
}

#[tokio::test]
async fn invalid_branch_kept_when_deletion_disabled() {
    let config = config("", "^feature/.+", "false");
    let forge = MockForge::new();
    let reporter = MemoryReporter::new();

    let verdict = PolicyRunner::new(&config, &forge, &reporter)
        .run(&created("random"))
        .await
        .unwrap();

    assert!(matches!(
        verdict,
        Verdict::Rejected {
            deletion: Deletion::NotRequested,
            ..
        }
    ));
    assert!(forge.operations().is_empty());
}

#[tokio::test]
async fn ignored_branch_skips_everything() {
    let config = config("main", "^feature/.+", "true");
    let forge = MockForge::new();
    let reporter = MemoryReporter::new();

    let verdict = enforce(&config, &created("main"), &forge, &reporter)
        .await
        .unwrap();

    assert!(matches!(verdict, Verdict::Ignored { .. }));
    assert!(!reporter.contains("Validating"));
    assert!(forge.operations().is_empty());
}

#[tokio::test]
async fn ignore_list_does_not_prefix_match() {
    let config = config("main", "^feature/.+", "false");
    let result = enforce(&config, &created("main-old"), &MockForge::new(), &MemoryReporter::new()).await;
    assert!(matches!(result, Err(PolicyError::ValidationFailure { .. })));
}

#[tokio::test]
async fn empty_pattern_set_rejects_everything() {
    let config = config("", "", "false");
    let result = enforce(&config, &created("feature/x"), &MockForge::new(), &MemoryReporter::new()).await;
    assert!(matches!(result, Err(PolicyError::ValidationFailure { .. })));
}

#[tokio::test]
async fn deletion_failure_is_not_retried() {
    let config = config("", "^feature/.+", "true");
    let forge = MockForge::new().fail_on(FailOn::DeleteRef(ForgeError::RateLimited));

    let result = enforce(&config, &created("random"), &forge, &MemoryReporter::new()).await;

    assert!(matches!(
        result,
        Err(PolicyError::Deletion {
            source: ForgeError::RateLimited,
            ..
        })
    ));
    assert_eq!(forge.operations().len(), 1);
}

#[tokio::test]
async fn payload_driven_event() {
    let source = EventSource {
        name: "create".into(),
        repository: Some("octocat/hello-world".into()),
        ..Default::default()
    };
    let event = source
        .resolve(Some(r#"{"ref": "bugfix/123", "ref_type": "branch"}"#))
        .unwrap();

    let config = config("", "^feature/.+", "true");
    let forge = MockForge::new();
    let result = enforce(&config, &event, &forge, &MemoryReporter::new()).await;

    assert!(result.is_err());
    assert_eq!(
        forge.operations(),
        vec![MockOperation::DeleteRef {
            owner: "octocat".into(),
            repo: "hello-world".into(),
            ref_path: "heads/bugfix/123".into(),
        }]
    );
}

#[tokio::test]
async fn push_event_is_rejected() {
    let config = config("", "^feature/.+", "true");
    let event = Event {
        name: "push".into(),
        ref_type: None,
        ..created("feature/x")
    };
    let forge = MockForge::new();

    let result = enforce(&config, &event, &forge, &MemoryReporter::new()).await;

    assert!(matches!(result, Err(PolicyError::InvalidEvent { .. })));
    assert!(forge.operations().is_empty());
}
