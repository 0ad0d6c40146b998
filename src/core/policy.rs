//! core::policy
//!
//! The policy run: event gate, ignore filter, pattern match, optional
//! deletion.
//!
//! # Lifecycle
//!
//! ```text
//! Start → EventChecked → IgnoreChecked → Validated → (Deleted | Skipped) → Done
//! ```
//!
//! - A created tag stops the run at `EventChecked` (success, no-op).
//! - An ignored branch stops the run at `IgnoreChecked` (success, no-op, no
//!   pattern is evaluated).
//! - A valid branch ends at `Validated` (success).
//! - An invalid branch is deleted if the policy says so, and the run fails
//!   either way. Deletion is a side effect and never turns a violation into
//!   a pass.
//!
//! # Outcomes
//!
//! [`PolicyRunner::run`] returns a [`Verdict`] for every run that got as far
//! as a decision, including violations. `Err` is reserved for runs that could
//! not decide (unsupported event, broken pattern, missing ref).
//! [`Verdict::into_result`] folds a violation into [`PolicyError`] for the
//! host's single pass/fail signal.
//!
//! # Example
//!
//! ```
//! use branchpolicy::core::config::PolicyConfig;
//! use branchpolicy::core::event::Event;
//! use branchpolicy::core::policy::{PolicyRunner, Verdict};
//! use branchpolicy::forge::mock::MockForge;
//! use branchpolicy::ui::MemoryReporter;
//!
//! # tokio_test::block_on(async {
//! let config = PolicyConfig::new(["main"], ["^feature/.+"], false);
//! let forge = MockForge::new();
//! let reporter = MemoryReporter::new();
//! let runner = PolicyRunner::new(&config, &forge, &reporter);
//!
//! let event = Event::branch_created("refs/heads/feature/login", "octocat", "hello");
//! let verdict = runner.run(&event).await.unwrap();
//! assert!(verdict.is_success());
//! # });
//! ```

use std::fmt;

use super::config::PolicyConfig;
use super::deleter::delete_branch;
use super::error::PolicyError;
use super::event::{check_event, Event, EventError};
use super::ignore::should_ignore;
use super::matcher::validate;
use crate::forge::Forge;
use crate::ui::Reporter;

/// Stage of a policy run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Policy loaded, nothing checked yet
    Start,
    /// The event passed the gate
    EventChecked,
    /// The branch is not on the ignore list
    IgnoreChecked,
    /// The branch name was matched against the patterns
    Validated,
    /// The violating branch was removed
    Deleted,
    /// Deletion was not requested or could not be done
    Skipped,
    /// The run finished
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::EventChecked => "event-checked",
            Stage::IgnoreChecked => "ignore-checked",
            Stage::Validated => "validated",
            Stage::Deleted => "deleted",
            Stage::Skipped => "skipped",
            Stage::Done => "done",
        };
        write!(f, "{}", name)
    }
}

/// What happened to a violating branch.
#[derive(Debug)]
pub enum Deletion {
    /// The policy does not delete violating branches.
    NotRequested,
    /// The branch was deleted.
    Deleted,
    /// Deletion was attempted and failed (always `PolicyError::Deletion`).
    Failed(PolicyError),
}

/// Decision of a policy run.
#[derive(Debug)]
pub enum Verdict {
    /// The event created something other than a branch.
    NotABranch { ref_type: Option<String> },
    /// The branch is on the ignore list.
    Ignored { branch: String },
    /// The branch matched a pattern.
    Passed {
        branch: String,
        matched_pattern: String,
    },
    /// The branch matched no pattern.
    Rejected { branch: String, deletion: Deletion },
}

impl Verdict {
    /// Whether the host should see this run as successful.
    pub fn is_success(&self) -> bool {
        !matches!(self, Verdict::Rejected { .. })
    }

    /// The branch this verdict is about, if the run got that far.
    pub fn branch(&self) -> Option<&str> {
        match self {
            Verdict::NotABranch { .. } => None,
            Verdict::Ignored { branch }
            | Verdict::Passed { branch, .. }
            | Verdict::Rejected { branch, .. } => Some(branch.as_str()),
        }
    }

    /// Fold a rejection into the run's failure.
    ///
    /// A failed deletion is reported as the deletion error; any other
    /// rejection (deleted or not) as `ValidationFailure`.
    pub fn into_result(self) -> Result<Verdict, PolicyError> {
        match self {
            Verdict::Rejected {
                deletion: Deletion::Failed(err),
                ..
            } => Err(err),
            Verdict::Rejected { branch, .. } => Err(PolicyError::ValidationFailure { branch }),
            other => Ok(other),
        }
    }
}

/// Sequences the policy components for one event.
pub struct PolicyRunner<'a> {
    config: &'a PolicyConfig,
    forge: &'a dyn Forge,
    reporter: &'a dyn Reporter,
}

impl<'a> PolicyRunner<'a> {
    pub fn new(config: &'a PolicyConfig, forge: &'a dyn Forge, reporter: &'a dyn Reporter) -> Self {
        Self {
            config,
            forge,
            reporter,
        }
    }

    fn enter(&self, stage: Stage) {
        self.reporter.debug(&format!("stage: {}", stage));
    }

    /// Run the policy for `event`.
    ///
    /// # Errors
    ///
    /// - `InvalidEvent` if the event is not `create`
    /// - `Event(MissingRef)` if a branch was created but no ref is known
    /// - `PatternSyntax` if a configured pattern does not compile
    ///
    /// A deletion that cannot be attempted (`Event(MissingRepository)`) or
    /// fails is carried in the returned [`Verdict`] rather than returned here.
    pub async fn run(&self, event: &Event) -> Result<Verdict, PolicyError> {
        let reporter = self.reporter;
        self.enter(Stage::Start);
        self.log_policy();
        reporter.separator();

        if !check_event(event, reporter)? {
            reporter.info("Non 'branch' event detected. Exiting gracefully ...");
            self.enter(Stage::Done);
            return Ok(Verdict::NotABranch {
                ref_type: event.ref_type.clone(),
            });
        }
        self.enter(Stage::EventChecked);

        reporter.separator();
        self.log_event(event);
        let branch = event.branch_name().to_string();
        if branch.is_empty() {
            return Err(EventError::MissingRef.into());
        }
        reporter.info(&format!("branch_ref={}", event.git_ref));
        reporter.info(&format!("branch_name={}", branch));

        reporter.separator();
        if should_ignore(self.config.ignore_list(), &branch, reporter) {
            reporter.info(
                "Current branch matches ignore condition. Skipping enforcement. Exiting gracefully ...",
            );
            self.enter(Stage::Done);
            return Ok(Verdict::Ignored { branch });
        }
        self.enter(Stage::IgnoreChecked);

        reporter.separator();
        let result = validate(self.config.patterns(), &branch, reporter)?;
        self.enter(Stage::Validated);

        if let Some(matched_pattern) = result.matched_pattern {
            reporter.info("Branch passes all checks. Exiting gracefully ...");
            self.enter(Stage::Done);
            return Ok(Verdict::Passed {
                branch,
                matched_pattern,
            });
        }
        reporter.error("Branch did not pass pattern validation!");

        reporter.separator();
        let deletion = self.handle_violation(event).await;
        self.enter(Stage::Done);
        Ok(Verdict::Rejected { branch, deletion })
    }

    async fn handle_violation(&self, event: &Event) -> Deletion {
        if !self.config.delete_on_violation() {
            self.enter(Stage::Skipped);
            self.reporter.warning("Branch is not deleted!");
            return Deletion::NotRequested;
        }

        let (owner, repo) = match event.repository() {
            Ok(slug) => slug,
            Err(err) => {
                self.reporter
                    .error(&format!("Branch deletion failed: {}", err));
                self.enter(Stage::Skipped);
                return Deletion::Failed(err.into());
            }
        };

        let outcome =
            delete_branch(self.forge, owner, repo, &event.git_ref, self.reporter).await;

        match outcome {
            Ok(()) => {
                self.enter(Stage::Deleted);
                self.reporter.warning("Branch is deleted!");
                Deletion::Deleted
            }
            Err(err) => {
                self.enter(Stage::Skipped);
                Deletion::Failed(err)
            }
        }
    }

    fn log_policy(&self) {
        let ignores: Vec<&str> = self.config.ignore_list().iter().map(String::as_str).collect();
        self.reporter
            .debug(&format!("ignore_branches={}", ignores.join(";")));
        self.reporter
            .debug(&format!("regex_patterns={}", self.config.patterns().join(";")));
        self.reporter.debug(&format!(
            "delete_branch={}",
            self.config.delete_on_violation()
        ));
    }

    fn log_event(&self, event: &Event) {
        let body = serde_json::to_string_pretty(event).unwrap_or_else(|_| format!("{:?}", event));
        self.reporter.group("Event context data", &body);
        self.reporter.group(
            "Repository",
            &format!("owner={} repo={}", event.repo_owner, event.repo_name),
        );
    }
}

/// Run the policy and fold the verdict into a single pass/fail result.
///
/// # Errors
///
/// Any [`PolicyError`]; a rejected branch yields `ValidationFailure` (or
/// `Deletion` if deleting it failed).
pub async fn enforce(
    config: &PolicyConfig,
    event: &Event,
    forge: &dyn Forge,
    reporter: &dyn Reporter,
) -> Result<Verdict, PolicyError> {
    PolicyRunner::new(config, forge, reporter)
        .run(event)
        .await?
        .into_result()
}
