//! Review items (open pull requests) and check-state aggregation.

use serde::{Deserialize, Serialize};

/// Raw check states that mean "finished, not successfully".
const FAILED_TOKENS: [&str; 4] = ["FAIL", "ERROR", "CANCEL", "TIMED_OUT"];

/// Raw check states that mean "not finished yet".
const PENDING_TOKENS: [&str; 4] = ["PENDING", "QUEUED", "IN_PROGRESS", "REQUESTED"];

/// Family a single raw check state belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckFamily {
    Failed,
    Pending,
    Passed,
}

impl CheckFamily {
    /// Classify a raw status string by case-insensitive substring match.
    ///
    /// The failed family wins when a string matches both sets.
    pub fn classify(raw: &str) -> Self {
        let upper = raw.to_ascii_uppercase();
        if FAILED_TOKENS.iter().any(|token| upper.contains(token)) {
            CheckFamily::Failed
        } else if PENDING_TOKENS.iter().any(|token| upper.contains(token)) {
            CheckFamily::Pending
        } else {
            CheckFamily::Passed
        }
    }
}

/// Aggregated CI state of a review item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckState {
    Success,
    Pending,
    Failure,
}

impl CheckState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckState::Success => "SUCCESS",
            CheckState::Pending => "PENDING",
            CheckState::Failure => "FAILURE",
        }
    }
}

impl std::fmt::Display for CheckState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate state plus per-family counts for one head commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSummary {
    pub state: CheckState,
    pub failed: usize,
    pub pending: usize,
}

impl CheckSummary {
    /// Aggregate a set of raw check states.
    ///
    /// FAILURE if any state is in the failed family, else PENDING if any is
    /// in the pending family, else SUCCESS. Order of `states` is irrelevant.
    pub fn from_states<I, S>(states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut failed = 0;
        let mut pending = 0;
        for raw in states {
            match CheckFamily::classify(raw.as_ref()) {
                CheckFamily::Failed => failed += 1,
                CheckFamily::Pending => pending += 1,
                CheckFamily::Passed => {}
            }
        }

        let state = if failed > 0 {
            CheckState::Failure
        } else if pending > 0 {
            CheckState::Pending
        } else {
            CheckState::Success
        };

        CheckSummary {
            state,
            failed,
            pending,
        }
    }
}

/// An open pull request authored by the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub number: u64,
    pub title: String,
    pub author: String,
    pub head_sha: String,
    pub checks: CheckSummary,
}

impl ReviewItem {
    pub fn new<I, S>(
        number: u64,
        title: impl Into<String>,
        author: impl Into<String>,
        head_sha: impl Into<String>,
        states: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ReviewItem {
            number,
            title: title.into(),
            author: author.into(),
            head_sha: head_sha.into(),
            checks: CheckSummary::from_states(states),
        }
    }

    pub fn state(&self) -> CheckState {
        self.checks.state
    }
}
