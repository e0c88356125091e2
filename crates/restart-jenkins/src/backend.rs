//! Jenkins backend.
//!
//! Jenkins builds are discovered through the GitHub commit status API: each
//! status Jenkins posts carries the build URL as its `target_url`. Statuses
//! from the trigger job (the shim that fans a push out to the real jobs) are
//! never offered, since rebuilding them would re-run everything.

use std::sync::Arc;

use async_trait::async_trait;
use restart_core::config::is_trigger_job;
use restart_core::{BackendKind, CiBackend, Result, SubTask, SubTaskState};
use restart_github::{CommitStatus, GhCli};
use tracing::debug;

use crate::client::JenkinsClient;

pub const JENKINS_RUN_NAME: &str = "Jenkins Job";

const FAILED_STATES: [&str; 2] = ["failure", "error"];

/// Failed Jenkins statuses that are not trigger jobs, as sub-tasks.
pub fn failing_jobs(statuses: Vec<CommitStatus>, trigger_patterns: &[String]) -> Vec<SubTask> {
    statuses
        .into_iter()
        .filter(|s| FAILED_STATES.contains(&s.state.as_str()))
        .filter_map(|s| {
            let url = s.target_url.filter(|u| !u.is_empty())?;
            if is_trigger_job(trigger_patterns, &url) {
                debug!(url = %url, "skipping trigger job");
                return None;
            }
            Some(SubTask {
                backend: BackendKind::Jenkins,
                id: url,
                workflow_name: s.context,
                run_name: JENKINS_RUN_NAME.to_string(),
                state: SubTaskState::from_raw(&s.state),
                created_at: s.updated_at,
            })
        })
        .collect()
}

pub struct JenkinsBackend {
    gh: Arc<GhCli>,
    repo: String,
    client: Arc<JenkinsClient>,
    trigger_patterns: Vec<String>,
}

impl JenkinsBackend {
    pub fn new(
        gh: Arc<GhCli>,
        repo: impl Into<String>,
        client: Arc<JenkinsClient>,
        trigger_patterns: Vec<String>,
    ) -> Self {
        JenkinsBackend {
            gh,
            repo: repo.into(),
            client,
            trigger_patterns,
        }
    }
}

#[async_trait]
impl CiBackend for JenkinsBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Jenkins
    }

    async fn list_failing_or_pending(&self, sha: &str) -> Result<Vec<SubTask>> {
        let statuses = self.gh.commit_statuses(&self.repo, sha).await?;
        Ok(failing_jobs(statuses, &self.trigger_patterns))
    }

    async fn restart(&self, task: &SubTask) -> Result<()> {
        self.client.rebuild(&task.id).await
    }

    async fn describe(&self, id: &str) -> Result<String> {
        Ok(format!(
            "Jenkins build\n\n{id}\n\nBuild details are not available through the GitHub API.\nOpen the URL above to inspect the console log."
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restart_core::config::DEFAULT_TRIGGER_PATTERN;

    fn status(state: &str, url: Option<&str>, context: &str) -> CommitStatus {
        CommitStatus {
            state: state.to_string(),
            target_url: url.map(str::to_string),
            context: context.to_string(),
            updated_at: "2024-05-01T10:00:00Z".to_string(),
        }
    }

    fn patterns() -> Vec<String> {
        vec![DEFAULT_TRIGGER_PATTERN.to_string()]
    }

    #[test]
    fn keeps_failed_and_errored_builds() {
        let tasks = failing_jobs(
            vec![
                status("failure", Some("https://ci.example/job/lint/42/"), "lint"),
                status("error", Some("https://ci.example/job/unit/7/"), "unit"),
                status("success", Some("https://ci.example/job/docs/3/"), "docs"),
                status("pending", Some("https://ci.example/job/e2e/9/"), "e2e"),
            ],
            &patterns(),
        );

        let names: Vec<_> = tasks.iter().map(|t| t.workflow_name.as_str()).collect();
        assert_eq!(names, vec!["lint", "unit"]);
        assert_eq!(tasks[0].id, "https://ci.example/job/lint/42/");
        assert_eq!(tasks[0].run_name, JENKINS_RUN_NAME);
        assert_eq!(tasks[0].created_at, "2024-05-01T10:00:00Z");
        assert!(tasks.iter().all(|t| t.state == SubTaskState::Failure));
    }

    #[test]
    fn trigger_jobs_are_never_offered() {
        let tasks = failing_jobs(
            vec![status(
                "failure",
                Some("https://ci.example/job/github_trigger/job/main/12/"),
                "trigger",
            )],
            &patterns(),
        );
        assert!(tasks.is_empty());
    }

    #[test]
    fn statuses_without_target_url_are_skipped() {
        let tasks = failing_jobs(
            vec![status("failure", None, "lint"), status("error", Some(""), "unit")],
            &patterns(),
        );
        assert!(tasks.is_empty());
    }
}
