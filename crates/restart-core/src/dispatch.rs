//! Restart dispatch and outcome tally.

use serde::Serialize;
use tracing::{info, warn};

use crate::backend::BackendRegistry;
use crate::error::RestartError;
use crate::task::SubTask;

/// Result of one restart attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestartOutcome {
    pub task: SubTask,

    /// Failure reason; `None` when the restart was accepted.
    pub error: Option<String>,
}

impl RestartOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Success/failure counts over a dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub succeeded: usize,
    pub failed: usize,
}

impl Tally {
    pub fn record(&mut self, outcome: &RestartOutcome) {
        if outcome.succeeded() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

impl std::fmt::Display for Tally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} succeeded, {} failed", self.succeeded, self.failed)
    }
}

/// All outcomes of a dispatch, in attempt order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DispatchReport {
    pub outcomes: Vec<RestartOutcome>,
    pub tally: Tally,
}

/// Progress notifications emitted while dispatching.
#[derive(Debug)]
pub enum DispatchEvent<'a> {
    Started(&'a SubTask),
    Finished(&'a RestartOutcome),
}

/// Restart every task in order, one request at a time.
///
/// A failed restart is recorded and the loop moves on; nothing is retried.
/// `on_event` fires before and after each attempt so callers can report
/// progress as it happens.
pub async fn restart_all<F>(
    registry: &BackendRegistry,
    tasks: &[SubTask],
    mut on_event: F,
) -> DispatchReport
where
    F: FnMut(DispatchEvent<'_>),
{
    let mut report = DispatchReport::default();

    for task in tasks {
        on_event(DispatchEvent::Started(task));

        let result = match registry.get(task.backend) {
            Some(backend) => backend.restart(task).await,
            None => Err(RestartError::UnknownBackend(task.backend)),
        };

        let outcome = match result {
            Ok(()) => {
                info!(backend = %task.backend, id = %task.id, "restart requested");
                RestartOutcome {
                    task: task.clone(),
                    error: None,
                }
            }
            Err(err) => {
                warn!(backend = %task.backend, id = %task.id, error = %err, "restart failed");
                RestartOutcome {
                    task: task.clone(),
                    error: Some(err.to_string()),
                }
            }
        };

        report.tally.record(&outcome);
        on_event(DispatchEvent::Finished(&outcome));
        report.outcomes.push(outcome);
    }

    report
}
