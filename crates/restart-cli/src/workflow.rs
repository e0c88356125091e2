//! The interactive restart session: pick a PR, pick its failing jobs,
//! restart them, report the tally.

use std::io::Write;
use std::sync::Arc;

use restart_core::{
    collect_subtasks, restart_all, BackendRegistry, ChoiceLine, Chooser, DispatchEvent,
    DispatchReport, PreviewKey, RestartError, Result, ReviewItem, ReviewSource, SubTask,
};
use tracing::{info, warn};

use crate::render;

/// How a session ended. Every variant is a normal exit.
#[derive(Debug)]
pub enum WorkflowOutcome {
    NoItems,
    NoItemSelected,
    NoSubTasks { number: u64 },
    NothingSelected { number: u64 },
    Completed { number: u64, report: DispatchReport },
}

pub struct RestartWorkflow {
    source: Arc<dyn ReviewSource>,
    registry: BackendRegistry,
    chooser: Arc<dyn Chooser>,
    repo: String,
    pr_limit: usize,
}

impl RestartWorkflow {
    pub fn new(
        source: Arc<dyn ReviewSource>,
        registry: BackendRegistry,
        chooser: Arc<dyn Chooser>,
        repo: impl Into<String>,
        pr_limit: usize,
    ) -> Self {
        RestartWorkflow {
            source,
            registry,
            chooser,
            repo: repo.into(),
            pr_limit,
        }
    }

    /// Run one session, writing operator-facing progress to `out`.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<WorkflowOutcome> {
        writeln!(out, "Select a PR:")?;
        writeln!(out, "Fetching your PRs with check status...")?;
        let items = self.source.list_open_items(&self.repo, self.pr_limit).await?;
        info!(repo = %self.repo, count = items.len(), "listed pull requests");

        if items.is_empty() {
            writeln!(out, "No PRs found.")?;
            writeln!(out, "No PR selected, exiting.")?;
            return Ok(WorkflowOutcome::NoItems);
        }

        let lines: Vec<ChoiceLine> = items
            .iter()
            .map(|item| ChoiceLine::new(render::item_line(item), PreviewKey::Item(item.number)))
            .collect();
        let chosen = self.chooser.choose_one(render::ITEM_HEADER, &lines).await?;
        let Some(item) = chosen.and_then(|index| pick(&items, index)) else {
            writeln!(out, "No PR selected, exiting.")?;
            return Ok(WorkflowOutcome::NoItemSelected);
        };
        writeln!(out, "Selected PR: #{}", item.number)?;

        let sha = self.head_sha(item).await?;
        let labels: Vec<&str> = self.registry.iter().map(|b| b.kind().label()).collect();
        writeln!(out, "Fetching {} jobs for PR #{}...", labels.join(" and "), item.number)?;
        let tasks = collect_subtasks(&self.registry, &sha).await;

        if tasks.is_empty() {
            writeln!(out, "No failed or pending jobs found for PR #{}", item.number)?;
            return Ok(WorkflowOutcome::NoSubTasks { number: item.number });
        }

        writeln!(out, "Select jobs to restart:")?;
        let lines: Vec<ChoiceLine> = tasks
            .iter()
            .map(|task| {
                ChoiceLine::new(
                    render::task_line(task),
                    PreviewKey::Task {
                        backend: task.backend,
                        id: task.id.clone(),
                    },
                )
            })
            .collect();
        let selected: Vec<SubTask> = self
            .chooser
            .choose_many(&render::task_header(), &lines)
            .await?
            .into_iter()
            .filter_map(|index| pick(&tasks, index).cloned())
            .collect();
        if selected.is_empty() {
            writeln!(out, "No jobs selected, exiting.")?;
            return Ok(WorkflowOutcome::NothingSelected { number: item.number });
        }

        writeln!(out, "Restarting selected jobs...")?;
        let mut write_error = None;
        let report = restart_all(&self.registry, &selected, |event| {
            let written = match event {
                DispatchEvent::Started(task) => writeln!(
                    out,
                    "↻ Restarting {} job: {}",
                    task.backend.tag(),
                    task.workflow_name
                ),
                DispatchEvent::Finished(outcome) => {
                    let task = &outcome.task;
                    let verdict = if outcome.succeeded() {
                        "✅ Successfully restarted"
                    } else {
                        "❌ Failed to restart"
                    };
                    writeln!(out, "{verdict} {} job: {}\n", task.backend.tag(), task.workflow_name)
                }
            };
            if let Err(err) = written {
                write_error.get_or_insert(err);
            }
        })
        .await;
        if let Some(err) = write_error {
            return Err(err.into());
        }

        write_summary(out, &report)?;
        Ok(WorkflowOutcome::Completed {
            number: item.number,
            report,
        })
    }

    /// The item's head SHA, re-queried when the listing did not carry one.
    async fn head_sha(&self, item: &ReviewItem) -> Result<String> {
        if !item.head_sha.is_empty() {
            return Ok(item.head_sha.clone());
        }
        match self.source.head_sha(&self.repo, item.number).await {
            Ok(Some(sha)) => Ok(sha),
            Ok(None) => Err(RestartError::MissingHeadSha(item.number)),
            Err(err) => {
                warn!(number = item.number, error = %err, "head SHA lookup failed");
                Err(RestartError::MissingHeadSha(item.number))
            }
        }
    }
}

/// `items[index]`, or `None` (logged) when the chooser answered out of range.
fn pick<T>(items: &[T], index: usize) -> Option<&T> {
    let picked = items.get(index);
    if picked.is_none() {
        warn!(index, len = items.len(), "chooser returned an index outside the list");
    }
    picked
}

pub fn write_summary<W: Write>(out: &mut W, report: &DispatchReport) -> std::io::Result<()> {
    writeln!(out, "Summary: {}", report.tally)?;
    writeln!(out, "✅ Successfully restarted: {} jobs", report.tally.succeeded)?;
    writeln!(out, "❌ Failed to restart: {} jobs", report.tally.failed)?;
    writeln!(out)?;
    writeln!(out, "Check the Actions tab and Jenkins to monitor the restarted jobs.")
}
