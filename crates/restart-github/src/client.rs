//! `gh` CLI client.
//!
//! Every GitHub interaction goes through the authenticated `gh` binary, so
//! the tool inherits whatever login `gh auth login` established.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use restart_core::{ItemDetail, RestartConfig, RestartError, Result, ReviewItem, ReviewSource};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::{CombinedStatus, CommitStatus, PullRequest, PullRequestView, RunJob, RunJobs, WorkflowRun};
use crate::runner::{CommandRunner, ProcessRunner};

const PR_LIST_FIELDS: &str = "number,title,author,headRefOid,statusCheckRollup";
const RUN_LIST_FIELDS: &str = "databaseId,name,conclusion,status,workflowName,createdAt";

/// Thin async wrapper over the `gh` binary.
pub struct GhCli {
    runner: Arc<dyn CommandRunner>,
    binary: PathBuf,
}

impl GhCli {
    pub fn new(runner: Arc<dyn CommandRunner>, binary: impl Into<PathBuf>) -> Self {
        GhCli {
            runner,
            binary: binary.into(),
        }
    }

    /// Client running the configured `gh` binary as a child process.
    pub fn from_config(config: &RestartConfig) -> Self {
        Self::new(Arc::new(ProcessRunner), config.gh_bin.clone())
    }

    pub fn repo_view_args() -> Vec<String> {
        args(&["repo", "view", "--json", "nameWithOwner", "-q", ".nameWithOwner"])
    }

    pub fn pr_list_args(repo: &str, limit: usize) -> Vec<String> {
        let limit = limit.to_string();
        args(&[
            "pr", "list", "--author", "@me", "--repo", repo, "--limit", &limit, "--json",
            PR_LIST_FIELDS,
        ])
    }

    pub fn pr_view_args(repo: &str, number: u64) -> Vec<String> {
        let number = number.to_string();
        args(&["pr", "view", &number, "--repo", repo, "--json", "title,body"])
    }

    pub fn pr_head_args(repo: &str, number: u64) -> Vec<String> {
        let number = number.to_string();
        args(&[
            "pr", "view", &number, "--repo", repo, "--json", "headRefOid", "-q", ".headRefOid",
        ])
    }

    pub fn run_list_args(repo: &str, sha: &str) -> Vec<String> {
        args(&[
            "run", "list", "--repo", repo, "--commit", sha, "--json", RUN_LIST_FIELDS,
        ])
    }

    pub fn run_view_args(repo: &str, run_id: &str) -> Vec<String> {
        args(&["run", "view", run_id, "--repo", repo, "--json", "jobs"])
    }

    pub fn run_rerun_args(repo: &str, run_id: &str) -> Vec<String> {
        args(&["run", "rerun", run_id, "--repo", repo, "--failed"])
    }

    pub fn commit_status_args(repo: &str, sha: &str) -> Vec<String> {
        vec![
            "api".to_string(),
            format!("repos/{repo}/commits/{sha}/status"),
        ]
    }

    /// Run `gh` and return stdout, failing on a non-zero exit.
    async fn run_gh(&self, args: Vec<String>) -> Result<String> {
        let command = format!("{} {}", self.binary.display(), args.join(" "));
        debug!(command = %command, "running gh");

        let output = self
            .runner
            .run(&self.binary, &args)
            .await
            .map_err(|err| RestartError::Command {
                command: command.clone(),
                detail: match err.kind() {
                    std::io::ErrorKind::NotFound => format!(
                        "GitHub CLI `{}` was not found; install gh and run `gh auth login`",
                        self.binary.display()
                    ),
                    _ => err.to_string(),
                },
            })?;

        if !output.succeeded() {
            return Err(RestartError::Command {
                command,
                detail: output.detail(),
            });
        }
        Ok(output.stdout)
    }

    async fn run_gh_json<T: DeserializeOwned>(&self, args: Vec<String>) -> Result<T> {
        let stdout = self.run_gh(args).await?;
        Ok(serde_json::from_str(&stdout)?)
    }

    /// Canonical `owner/name` of the repository in the working directory.
    pub async fn repository(&self) -> Result<String> {
        let repo = self.run_gh(Self::repo_view_args()).await?.trim().to_string();
        if repo.is_empty() {
            return Err(RestartError::Command {
                command: "gh repo view".to_string(),
                detail: "no repository found for the current directory".to_string(),
            });
        }
        Ok(repo)
    }

    pub async fn pull_requests(&self, repo: &str, limit: usize) -> Result<Vec<PullRequest>> {
        self.run_gh_json(Self::pr_list_args(repo, limit)).await
    }

    pub async fn pull_request_view(&self, repo: &str, number: u64) -> Result<PullRequestView> {
        self.run_gh_json(Self::pr_view_args(repo, number)).await
    }

    pub async fn pull_request_head(&self, repo: &str, number: u64) -> Result<Option<String>> {
        let sha = self.run_gh(Self::pr_head_args(repo, number)).await?;
        let sha = sha.trim();
        Ok((!sha.is_empty()).then(|| sha.to_string()))
    }

    pub async fn workflow_runs(&self, repo: &str, sha: &str) -> Result<Vec<WorkflowRun>> {
        self.run_gh_json(Self::run_list_args(repo, sha)).await
    }

    pub async fn run_jobs(&self, repo: &str, run_id: &str) -> Result<Vec<RunJob>> {
        let jobs: RunJobs = self.run_gh_json(Self::run_view_args(repo, run_id)).await?;
        Ok(jobs.jobs)
    }

    /// Re-run only the failed jobs of a workflow run.
    pub async fn rerun_failed(&self, repo: &str, run_id: &str) -> Result<()> {
        self.run_gh(Self::run_rerun_args(repo, run_id)).await.map(|_| ())
    }

    pub async fn commit_statuses(&self, repo: &str, sha: &str) -> Result<Vec<CommitStatus>> {
        let combined: CombinedStatus = self.run_gh_json(Self::commit_status_args(repo, sha)).await?;
        Ok(combined.statuses)
    }
}

#[async_trait]
impl ReviewSource for GhCli {
    async fn repository(&self) -> Result<String> {
        GhCli::repository(self).await
    }

    async fn list_open_items(&self, repo: &str, limit: usize) -> Result<Vec<ReviewItem>> {
        let prs = self.pull_requests(repo, limit).await?;
        Ok(prs.into_iter().map(PullRequest::into_review_item).collect())
    }

    async fn item_detail(&self, repo: &str, number: u64) -> Result<ItemDetail> {
        self.pull_request_view(repo, number).await.map(ItemDetail::from)
    }

    async fn head_sha(&self, repo: &str, number: u64) -> Result<Option<String>> {
        self.pull_request_head(repo, number).await
    }
}

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{CommandOutput, ScriptedRunner};
    use restart_core::CheckState;

    fn gh(runner: ScriptedRunner) -> (Arc<ScriptedRunner>, GhCli) {
        let runner = Arc::new(runner);
        (runner.clone(), GhCli::new(runner, "gh"))
    }

    #[tokio::test]
    async fn repository_trims_output() {
        let (_, client) = gh(ScriptedRunner::new().respond(
            "repo view --json nameWithOwner -q .nameWithOwner",
            CommandOutput::success("octo/widgets\n"),
        ));
        assert_eq!(client.repository().await.unwrap(), "octo/widgets");
    }

    #[tokio::test]
    async fn repository_failure_carries_stderr() {
        let (_, client) = gh(ScriptedRunner::new().respond(
            "repo view --json nameWithOwner -q .nameWithOwner",
            CommandOutput::failure(1, "not a git repository"),
        ));
        let err = client.repository().await.unwrap_err();
        assert!(err.to_string().contains("not a git repository"));
    }

    #[tokio::test]
    async fn list_open_items_parses_and_aggregates() {
        let json = r#"[
            {"number": 42, "title": "Fix", "author": {"login": "octo"}, "headRefOid": "abc123",
             "statusCheckRollup": [{"__typename": "CheckRun", "conclusion": "FAILURE", "status": "COMPLETED"}]},
            {"number": 43, "title": "Docs", "author": {"login": "octo"}, "headRefOid": "def456",
             "statusCheckRollup": []}
        ]"#;
        let (runner, client) = gh(ScriptedRunner::new().respond(
            "pr list --author @me --repo octo/widgets --limit 50 --json number,title,author,headRefOid,statusCheckRollup",
            CommandOutput::success(json),
        ));

        let items = client.list_open_items("octo/widgets", 50).await.unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].state(), CheckState::Failure);
        assert_eq!(items[1].state(), CheckState::Success);
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn malformed_json_is_an_error() {
        let (_, client) = gh(ScriptedRunner::new().respond(
            "run list --repo octo/widgets --commit abc --json databaseId,name,conclusion,status,workflowName,createdAt",
            CommandOutput::success("not json"),
        ));
        let err = client.workflow_runs("octo/widgets", "abc").await.unwrap_err();
        assert!(matches!(err, RestartError::Json(_)));
    }

    #[tokio::test]
    async fn head_sha_empty_is_none() {
        let (_, client) = gh(ScriptedRunner::new().respond(
            "pr view 42 --repo octo/widgets --json headRefOid -q .headRefOid",
            CommandOutput::success("\n"),
        ));
        assert_eq!(client.head_sha("octo/widgets", 42).await.unwrap(), None);
    }

    #[tokio::test]
    async fn item_detail_tolerates_null_body() {
        let (_, client) = gh(ScriptedRunner::new().respond(
            "pr view 42 --repo octo/widgets --json title,body",
            CommandOutput::success(r#"{"title": "Fix", "body": null}"#),
        ));
        let detail = client.item_detail("octo/widgets", 42).await.unwrap();
        assert_eq!(detail.render(), "Title: Fix\n\nBody:\n");
    }

    #[tokio::test]
    async fn commit_statuses_uses_api_path() {
        let (runner, client) = gh(ScriptedRunner::new().respond(
            "api repos/octo/widgets/commits/abc123/status",
            CommandOutput::success(r#"{"state": "failure", "statuses": []}"#),
        ));
        assert!(client.commit_statuses("octo/widgets", "abc123").await.unwrap().is_empty());
        assert_eq!(runner.call_lines(), vec!["api repos/octo/widgets/commits/abc123/status"]);
    }

    #[test]
    fn rerun_args_only_failed_jobs() {
        assert_eq!(
            GhCli::run_rerun_args("octo/widgets", "555").join(" "),
            "run rerun 555 --repo octo/widgets --failed"
        );
    }
}
