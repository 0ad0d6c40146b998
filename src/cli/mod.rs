//! cli
//!
//! Command-line interface layer.
//!
//! # Responsibilities
//!
//! - Parse arguments and environment into the policy inputs and event source
//! - Build the immutable configuration, the event, and the forge
//! - Run the policy once and turn the outcome into a single exit status
//!
//! # Architecture
//!
//! The CLI layer is thin. All decisions live in [`crate::core::policy`];
//! this module only wires collaborators together and is the one place where
//! failures are reported to the host.

pub mod args;

pub use args::Cli;

use std::process::ExitCode;

use anyhow::{Context, Result};

use crate::core::config::PolicyConfig;
use crate::core::policy::{enforce, Verdict};
use crate::core::PolicyError;
use crate::forge::github::GitHubForge;
use crate::ui::{ActionsReporter, Reporter, Verbosity};

/// A failed run, with the branch it concerned when known.
#[derive(Debug)]
pub struct RunFailure {
    /// Branch name, if the event was read before the failure
    pub branch: Option<String>,
    /// What went wrong
    pub error: PolicyError,
}

impl RunFailure {
    fn before_event(error: impl Into<PolicyError>) -> Self {
        Self {
            branch: None,
            error: error.into(),
        }
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`. Policy outcomes,
/// including failures, are reported through the run log and mapped to the
/// returned exit code; `Err` means the process could not run the policy at all.
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse_args();
    init_logging(cli.verbosity());

    let reporter = ActionsReporter::new(cli.verbosity());
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;

    match runtime.block_on(execute(&cli, &reporter)) {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(failure) => {
            report_failure(&failure, &reporter);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Load configuration and event, then enforce the policy.
///
/// # Errors
///
/// Returns a [`RunFailure`] for every way the run can fail, including a
/// branch that violates the policy.
pub async fn execute(cli: &Cli, reporter: &dyn Reporter) -> Result<Verdict, RunFailure> {
    reporter.debug("Running branch policy ...");

    let config = PolicyConfig::load(cli.config.as_deref(), &cli.policy_inputs())
        .map_err(RunFailure::before_event)?;
    let event = cli
        .event_source()
        .load()
        .map_err(RunFailure::before_event)?;

    let forge = GitHubForge::with_api_base(cli.github_token.clone(), cli.api_url.clone());
    log::debug!("using forge {:?}", forge);

    enforce(&config, &event, &forge, reporter)
        .await
        .map_err(|error| RunFailure {
            branch: Some(event.branch_name().to_string()).filter(|b| !b.is_empty()),
            error,
        })
}

/// Report a failed run to the host.
pub fn report_failure(failure: &RunFailure, reporter: &dyn Reporter) {
    reporter.warning(&format!(
        "Branch name: {}",
        failure.branch.as_deref().unwrap_or("<unknown>")
    ));
    reporter.error(&format!("Run failed. {}", failure.error));
    log::debug!("failure kind: {}", failure.error.kind());
}

fn init_logging(verbosity: Verbosity) {
    let filter = if verbosity == Verbosity::Debug {
        "debug"
    } else {
        "warn"
    };
    // A logger may already be installed when embedded in tests.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .try_init();
}
