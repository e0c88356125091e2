//! GitHub side of ci-restart.
//!
//! All calls go through the `gh` CLI: pull request listing and previews
//! (`ReviewSource`), workflow runs (`GithubActionsBackend`) and the commit
//! status API the Jenkins backend reads from.

pub mod actions;
pub mod client;
pub mod models;
pub mod runner;

pub use actions::GithubActionsBackend;
pub use client::GhCli;
pub use models::{CommitStatus, PullRequest, WorkflowRun};
pub use runner::{CommandOutput, CommandRunner, ProcessRunner, ScriptedRunner};
