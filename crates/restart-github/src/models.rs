//! JSON shapes returned by `gh`.

use restart_core::{BackendKind, ItemDetail, ReviewItem, SubTask, SubTaskState};
use serde::Deserialize;

/// Entry of `gh pr list --json ...`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub head_ref_oid: String,
    #[serde(default)]
    pub status_check_rollup: Option<Vec<RollupEntry>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    pub login: String,
}

/// One check attached to a PR's head commit: a `CheckRun` (Actions and
/// other check suites) or a `StatusContext` (commit status API).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RollupEntry {
    #[serde(rename = "__typename", default)]
    pub typename: String,
    #[serde(default)]
    pub conclusion: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl RollupEntry {
    /// The state string check aggregation looks at.
    ///
    /// Check runs report their `conclusion`, or their `status` while they
    /// have no conclusion yet. Status contexts report `state`.
    pub fn raw_state(&self) -> &str {
        if self.typename == "CheckRun" {
            non_empty(&self.conclusion)
                .or_else(|| non_empty(&self.status))
                .unwrap_or("")
        } else {
            non_empty(&self.state).unwrap_or("")
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl PullRequest {
    pub fn into_review_item(self) -> ReviewItem {
        let rollup = self.status_check_rollup.unwrap_or_default();
        let author = self.author.map(|a| a.login).unwrap_or_else(|| "ghost".to_string());
        ReviewItem::new(
            self.number,
            self.title,
            author,
            self.head_ref_oid,
            rollup.iter().map(RollupEntry::raw_state),
        )
    }
}

/// `gh pr view --json title,body`.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestView {
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
}

impl From<PullRequestView> for ItemDetail {
    fn from(view: PullRequestView) -> Self {
        ItemDetail {
            title: view.title,
            body: view.body.unwrap_or_default(),
        }
    }
}

/// Entry of `gh run list --json ...`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRun {
    pub database_id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub conclusion: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub workflow_name: String,
    #[serde(default)]
    pub created_at: String,
}

const RESTARTABLE_STATUSES: [&str; 3] = ["in_progress", "queued", "pending"];

impl WorkflowRun {
    /// Failed, or still queued/running.
    pub fn needs_restart(&self) -> bool {
        self.conclusion.as_deref() == Some("failure")
            || self
                .status
                .as_deref()
                .is_some_and(|s| RESTARTABLE_STATUSES.contains(&s))
    }

    pub fn into_subtask(self) -> SubTask {
        let raw = self
            .conclusion
            .as_deref()
            .filter(|c| !c.is_empty())
            .or(self.status.as_deref())
            .unwrap_or("");
        SubTask {
            backend: BackendKind::GithubActions,
            id: self.database_id.to_string(),
            state: SubTaskState::from_raw(raw),
            workflow_name: self.workflow_name,
            run_name: self.name,
            created_at: self.created_at,
        }
    }
}

/// `gh run view --json jobs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunJobs {
    #[serde(default)]
    pub jobs: Vec<RunJob>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunJob {
    pub name: String,
    #[serde(default)]
    pub conclusion: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl RunJob {
    pub fn outcome(&self) -> &str {
        self.conclusion
            .as_deref()
            .filter(|c| !c.is_empty())
            .or(self.status.as_deref())
            .unwrap_or("unknown")
    }
}

/// `gh api repos/{repo}/commits/{sha}/status`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CombinedStatus {
    #[serde(default)]
    pub statuses: Vec<CommitStatus>,
}

/// One commit status entry, as posted by external CI such as Jenkins.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitStatus {
    pub state: String,
    #[serde(default)]
    pub target_url: Option<String>,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use restart_core::CheckState;
    use serde_json::json;

    #[test]
    fn check_run_without_conclusion_uses_status() {
        let entry: RollupEntry = serde_json::from_value(json!({
            "__typename": "CheckRun",
            "conclusion": "",
            "status": "IN_PROGRESS"
        }))
        .unwrap();
        assert_eq!(entry.raw_state(), "IN_PROGRESS");
    }

    #[test]
    fn status_context_uses_state() {
        let entry: RollupEntry = serde_json::from_value(json!({
            "__typename": "StatusContext",
            "state": "ERROR",
            "context": "jenkins"
        }))
        .unwrap();
        assert_eq!(entry.raw_state(), "ERROR");
    }

    #[test]
    fn pull_request_aggregates_rollup() {
        let pr: PullRequest = serde_json::from_value(json!({
            "number": 42,
            "title": "Add feature",
            "author": {"login": "octo"},
            "headRefOid": "abc123",
            "statusCheckRollup": [
                {"__typename": "CheckRun", "conclusion": "SUCCESS", "status": "COMPLETED"},
                {"__typename": "CheckRun", "conclusion": "FAILURE", "status": "COMPLETED"},
                {"__typename": "StatusContext", "state": "PENDING"}
            ]
        }))
        .unwrap();

        let item = pr.into_review_item();
        assert_eq!(item.number, 42);
        assert_eq!(item.author, "octo");
        assert_eq!(item.head_sha, "abc123");
        assert_eq!(item.state(), CheckState::Failure);
        assert_eq!((item.checks.failed, item.checks.pending), (1, 1));
    }

    #[test]
    fn pull_request_with_null_rollup_is_success() {
        let pr: PullRequest = serde_json::from_value(json!({
            "number": 7,
            "title": "Docs",
            "author": null,
            "headRefOid": "def",
            "statusCheckRollup": null
        }))
        .unwrap();

        let item = pr.into_review_item();
        assert_eq!(item.state(), CheckState::Success);
        assert_eq!(item.author, "ghost");
    }

    #[test]
    fn workflow_run_filter() {
        let run = |conclusion: &str, status: &str| WorkflowRun {
            database_id: 1,
            name: "build".to_string(),
            conclusion: Some(conclusion.to_string()),
            status: Some(status.to_string()),
            workflow_name: "CI".to_string(),
            created_at: String::new(),
        };
        assert!(run("failure", "completed").needs_restart());
        assert!(run("", "in_progress").needs_restart());
        assert!(run("", "queued").needs_restart());
        assert!(!run("success", "completed").needs_restart());
        assert!(!run("cancelled", "completed").needs_restart());
    }

    #[test]
    fn workflow_run_into_subtask() {
        let run: WorkflowRun = serde_json::from_value(json!({
            "databaseId": 555,
            "name": "build",
            "conclusion": "",
            "status": "queued",
            "workflowName": "CI",
            "createdAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();

        let task = run.into_subtask();
        assert_eq!(task.id, "555");
        assert_eq!(task.backend, BackendKind::GithubActions);
        assert_eq!(task.state, SubTaskState::Pending);
        assert_eq!(task.workflow_name, "CI");
        assert_eq!(task.run_name, "build");
    }
}
