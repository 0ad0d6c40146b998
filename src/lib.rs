//! branchpolicy - branch naming policy enforcement for CI
//!
//! Runs once per branch-creation event: checks the event, skips ignored
//! branches, matches the branch name against the configured patterns, and
//! optionally deletes a branch that violates the policy.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line / CI host surface (parses inputs, reports the outcome)
//! - [`core`] - Configuration, event, and the policy components
//! - [`forge`] - Abstraction for the remote hosting service (GitHub)
//! - [`ui`] - Run log output
//!
//! # Invariants
//!
//! 1. A branch is valid iff at least one configured pattern matches it
//! 2. Ignored branches and created tags are never validated or deleted
//! 3. Deleting a violating branch never turns the run into a success

pub mod cli;
pub mod core;
pub mod forge;
pub mod ui;
