//! CI sub-tasks: one restartable unit of work on a backend.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::item::CheckFamily;

/// Backend a sub-task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// GitHub Actions workflow runs
    GithubActions,

    /// Jenkins builds reported through commit statuses
    Jenkins,
}

impl BackendKind {
    /// Short tag used in display lines and preview keys.
    pub fn tag(&self) -> &'static str {
        match self {
            BackendKind::GithubActions => "github",
            BackendKind::Jenkins => "jenkins",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            BackendKind::GithubActions => "🔧",
            BackendKind::Jenkins => "⚙️",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BackendKind::GithubActions => "GitHub Actions",
            BackendKind::Jenkins => "Jenkins",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "github" => Ok(BackendKind::GithubActions),
            "jenkins" => Ok(BackendKind::Jenkins),
            other => Err(format!("unknown backend tag: {other}")),
        }
    }
}

/// Display state of a sub-task offered for restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubTaskState {
    Failure,
    Pending,
}

impl SubTaskState {
    /// Map a backend's raw conclusion/status onto a display state.
    pub fn from_raw(raw: &str) -> Self {
        match CheckFamily::classify(raw) {
            CheckFamily::Pending => SubTaskState::Pending,
            _ => SubTaskState::Failure,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SubTaskState::Failure => "❌",
            SubTaskState::Pending => "🟡",
        }
    }
}

/// A failing or unfinished CI job attached to a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubTask {
    pub backend: BackendKind,

    /// Backend-specific identifier: run id for Actions, build URL for Jenkins.
    pub id: String,

    pub workflow_name: String,
    pub run_name: String,
    pub state: SubTaskState,

    /// Timestamp as reported by the backend (RFC 3339 when well-formed).
    pub created_at: String,
}

impl SubTask {
    /// `MM-DD HH:MM` in UTC, or the raw value when it does not parse.
    pub fn created_at_short(&self) -> String {
        match DateTime::parse_from_rfc3339(&self.created_at) {
            Ok(ts) => ts.naive_utc().format("%m-%d %H:%M").to_string(),
            Err(_) => self.created_at.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(created_at: &str) -> SubTask {
        SubTask {
            backend: BackendKind::GithubActions,
            id: "555".to_string(),
            workflow_name: "CI".to_string(),
            run_name: "build".to_string(),
            state: SubTaskState::Failure,
            created_at: created_at.to_string(),
        }
    }

    #[test]
    fn test_backend_tag_round_trip() {
        for kind in [BackendKind::GithubActions, BackendKind::Jenkins] {
            assert_eq!(kind.tag().parse::<BackendKind>().unwrap(), kind);
        }
        assert!("gitlab".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_state_from_raw() {
        assert_eq!(SubTaskState::from_raw("failure"), SubTaskState::Failure);
        assert_eq!(SubTaskState::from_raw("error"), SubTaskState::Failure);
        assert_eq!(SubTaskState::from_raw("in_progress"), SubTaskState::Pending);
        assert_eq!(SubTaskState::from_raw("queued"), SubTaskState::Pending);
    }

    #[test]
    fn test_created_at_short_formats_utc() {
        assert_eq!(task("2024-03-05T14:07:09Z").created_at_short(), "03-05 14:07");
        assert_eq!(
            task("2024-03-05T23:30:00-02:00").created_at_short(),
            "03-06 01:30"
        );
    }

    #[test]
    fn test_created_at_short_keeps_unparsable_value() {
        assert_eq!(task("yesterday").created_at_short(), "yesterday");
    }
}
