//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! Every input can also come from the environment, which is how a GitHub
//! Actions job hands them over: action inputs as `INPUT_*`, event context as
//! `GITHUB_*`. Flags win over the environment.

use clap::Parser;
use std::path::PathBuf;

use crate::core::config::PolicyInputs;
use crate::core::event::EventSource;
use crate::forge::github::DEFAULT_API_BASE;
use crate::ui::Verbosity;

/// Validate a newly created branch name against the naming policy
#[derive(Parser, Debug)]
#[command(name = "branch-policy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Token used to delete violating branches
    #[arg(long, env = "INPUT_GITHUB_TOKEN", hide_env_values = true, default_value = "")]
    pub github_token: String,

    /// ';'-delimited branch names exempt from validation
    #[arg(long, env = "INPUT_IGNORE_BRANCHES")]
    pub ignore_branches: Option<String>,

    /// ';'-delimited patterns; a branch must match at least one
    #[arg(long, env = "INPUT_REGEX")]
    pub regex: Option<String>,

    /// Delete branches that violate the policy ("true" to enable)
    #[arg(long, env = "INPUT_DELETE_BRANCH")]
    pub delete_branch: Option<String>,

    /// TOML policy file; explicit inputs override its values
    #[arg(long, env = "INPUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Name of the triggering event
    #[arg(long, env = "GITHUB_EVENT_NAME")]
    pub event_name: String,

    /// Full ref of the created branch (e.g., refs/heads/feature/x)
    #[arg(long = "ref", env = "GITHUB_REF")]
    pub git_ref: Option<String>,

    /// Path to the JSON event payload
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<PathBuf>,

    /// Repository as owner/name
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_BASE)]
    pub api_url: String,

    /// Enable debug logging
    #[arg(long, env = "RUNNER_DEBUG", value_parser = clap::builder::BoolishValueParser::new())]
    pub debug: bool,

    /// Only print warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Output verbosity from flags.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }

    /// Policy inputs.
    ///
    /// CI hosts export unset inputs as empty strings, so an empty value is
    /// treated as not provided and lets a policy file value through.
    pub fn policy_inputs(&self) -> PolicyInputs {
        PolicyInputs {
            ignore_branches: non_empty(&self.ignore_branches),
            regex: non_empty(&self.regex),
            delete_branch: non_empty(&self.delete_branch),
        }
    }

    /// Where to read the triggering event from.
    pub fn event_source(&self) -> EventSource {
        EventSource {
            name: self.event_name.clone(),
            git_ref: non_empty(&self.git_ref),
            repository: non_empty(&self.repository),
            payload_path: self.event_path.clone(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}
