//! GitHub Actions backend.

use std::sync::Arc;

use async_trait::async_trait;
use restart_core::{BackendKind, CiBackend, Result, SubTask};
use tracing::debug;

use crate::client::GhCli;
use crate::models::WorkflowRun;

/// Workflow runs on a commit, restarted with `gh run rerun --failed`.
pub struct GithubActionsBackend {
    gh: Arc<GhCli>,
    repo: String,
}

impl GithubActionsBackend {
    pub fn new(gh: Arc<GhCli>, repo: impl Into<String>) -> Self {
        GithubActionsBackend {
            gh,
            repo: repo.into(),
        }
    }
}

#[async_trait]
impl CiBackend for GithubActionsBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::GithubActions
    }

    async fn list_failing_or_pending(&self, sha: &str) -> Result<Vec<SubTask>> {
        let runs = self.gh.workflow_runs(&self.repo, sha).await?;
        let total = runs.len();
        let tasks: Vec<SubTask> = runs
            .into_iter()
            .filter(WorkflowRun::needs_restart)
            .map(WorkflowRun::into_subtask)
            .collect();
        debug!(sha = %sha, total, kept = tasks.len(), "filtered workflow runs");
        Ok(tasks)
    }

    async fn restart(&self, task: &SubTask) -> Result<()> {
        self.gh.rerun_failed(&self.repo, &task.id).await
    }

    /// One `name: outcome` line per job of the run.
    async fn describe(&self, id: &str) -> Result<String> {
        let jobs = self.gh.run_jobs(&self.repo, id).await?;
        if jobs.is_empty() {
            return Ok(format!("Run {id} has no jobs yet."));
        }
        Ok(jobs
            .iter()
            .map(|job| format!("{}: {}", job.name, job.outcome()))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
