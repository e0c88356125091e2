//! In-memory fakes for the backend, source and chooser traits (testing only)
//!
//! Each fake records the calls made to it so tests can assert on what the
//! workflow actually requested.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::backend::CiBackend;
use crate::chooser::{ChoiceLine, Chooser};
use crate::error::{RestartError, Result};
use crate::item::ReviewItem;
use crate::source::{ItemDetail, ReviewSource};
use crate::task::{BackendKind, SubTask, SubTaskState};

/// A failing sub-task with a fixed timestamp.
pub fn sample_task(backend: BackendKind, id: &str, workflow_name: &str) -> SubTask {
    SubTask {
        backend,
        id: id.to_string(),
        workflow_name: workflow_name.to_string(),
        run_name: workflow_name.to_string(),
        state: SubTaskState::Failure,
        created_at: "2024-01-02T03:04:05Z".to_string(),
    }
}

// ---------------------------------------------------------------------------
// MemoryBackend
// ---------------------------------------------------------------------------

/// Backend serving a fixed task list and recording restarts.
#[derive(Debug)]
pub struct MemoryBackend {
    kind: BackendKind,
    tasks: Vec<SubTask>,
    descriptions: HashMap<String, String>,
    fail_list: bool,
    fail_restart: HashSet<String>,
    listed: Mutex<Vec<String>>,
    restarted: Mutex<Vec<String>>,
}

impl MemoryBackend {
    pub fn new(kind: BackendKind) -> Self {
        MemoryBackend {
            kind,
            tasks: Vec::new(),
            descriptions: HashMap::new(),
            fail_list: false,
            fail_restart: HashSet::new(),
            listed: Mutex::new(Vec::new()),
            restarted: Mutex::new(Vec::new()),
        }
    }

    pub fn with_task(mut self, task: SubTask) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn with_description(mut self, id: &str, text: &str) -> Self {
        self.descriptions.insert(id.to_string(), text.to_string());
        self
    }

    /// Make `list_failing_or_pending` return an error.
    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    /// Make `restart` fail for the task with this id.
    pub fn failing_restart(mut self, id: &str) -> Self {
        self.fail_restart.insert(id.to_string());
        self
    }

    /// Commit SHAs listed so far.
    pub fn listed(&self) -> Vec<String> {
        self.listed.lock().unwrap().clone()
    }

    /// Task ids a restart was attempted for, in order.
    pub fn restarted(&self) -> Vec<String> {
        self.restarted.lock().unwrap().clone()
    }
}

#[async_trait]
impl CiBackend for MemoryBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    async fn list_failing_or_pending(&self, sha: &str) -> Result<Vec<SubTask>> {
        self.listed.lock().unwrap().push(sha.to_string());
        if self.fail_list {
            return Err(RestartError::Command {
                command: format!("list {}", self.kind),
                detail: "listing unavailable".to_string(),
            });
        }
        Ok(self.tasks.clone())
    }

    async fn restart(&self, task: &SubTask) -> Result<()> {
        self.restarted.lock().unwrap().push(task.id.clone());
        if self.fail_restart.contains(&task.id) {
            return Err(RestartError::Http(format!("restart of {} rejected", task.id)));
        }
        Ok(())
    }

    async fn describe(&self, id: &str) -> Result<String> {
        self.descriptions
            .get(id)
            .cloned()
            .ok_or_else(|| RestartError::Command {
                command: format!("describe {id}"),
                detail: "not found".to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// MemoryReviewSource
// ---------------------------------------------------------------------------

/// Review source backed by fixed items and details.
#[derive(Debug, Default)]
pub struct MemoryReviewSource {
    repo: String,
    items: Vec<ReviewItem>,
    details: HashMap<u64, ItemDetail>,
    head_shas: HashMap<u64, String>,
    limits: Mutex<Vec<usize>>,
}

impl MemoryReviewSource {
    pub fn new(repo: &str) -> Self {
        MemoryReviewSource {
            repo: repo.to_string(),
            ..Self::default()
        }
    }

    pub fn with_item(mut self, item: ReviewItem) -> Self {
        self.head_shas.insert(item.number, item.head_sha.clone());
        self.items.push(item);
        self
    }

    pub fn with_detail(mut self, number: u64, detail: ItemDetail) -> Self {
        self.details.insert(number, detail);
        self
    }

    /// Override what `head_sha` reports for an item (empty means none).
    pub fn with_head_sha(mut self, number: u64, sha: &str) -> Self {
        self.head_shas.insert(number, sha.to_string());
        self
    }

    /// Limits passed to `list_open_items` so far.
    pub fn requested_limits(&self) -> Vec<usize> {
        self.limits.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReviewSource for MemoryReviewSource {
    async fn repository(&self) -> Result<String> {
        Ok(self.repo.clone())
    }

    async fn list_open_items(&self, _repo: &str, limit: usize) -> Result<Vec<ReviewItem>> {
        self.limits.lock().unwrap().push(limit);
        Ok(self.items.iter().take(limit).cloned().collect())
    }

    async fn item_detail(&self, _repo: &str, number: u64) -> Result<ItemDetail> {
        self.details
            .get(&number)
            .cloned()
            .ok_or_else(|| RestartError::Command {
                command: format!("view #{number}"),
                detail: "no such pull request".to_string(),
            })
    }

    async fn head_sha(&self, _repo: &str, number: u64) -> Result<Option<String>> {
        Ok(self
            .head_shas
            .get(&number)
            .filter(|sha| !sha.is_empty())
            .cloned())
    }
}

// ---------------------------------------------------------------------------
// ScriptedChooser
// ---------------------------------------------------------------------------

/// Chooser that answers from pre-scripted selections.
///
/// Unscripted calls behave like an operator cancelling.
#[derive(Debug, Default)]
pub struct ScriptedChooser {
    one: Mutex<VecDeque<Option<usize>>>,
    many: Mutex<VecDeque<Vec<usize>>>,
    shown: Mutex<Vec<Vec<ChoiceLine>>>,
}

impl ScriptedChooser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_one(self, choice: Option<usize>) -> Self {
        self.one.lock().unwrap().push_back(choice);
        self
    }

    pub fn then_many(self, choices: Vec<usize>) -> Self {
        self.many.lock().unwrap().push_back(choices);
        self
    }

    /// Every line list the chooser was invoked with, in call order.
    pub fn shown(&self) -> Vec<Vec<ChoiceLine>> {
        self.shown.lock().unwrap().clone()
    }

    pub fn invocations(&self) -> usize {
        self.shown.lock().unwrap().len()
    }
}

#[async_trait]
impl Chooser for ScriptedChooser {
    async fn choose_one(&self, _header: &str, lines: &[ChoiceLine]) -> Result<Option<usize>> {
        self.shown.lock().unwrap().push(lines.to_vec());
        let choice = self.one.lock().unwrap().pop_front().flatten();
        Ok(choice.filter(|&i| i < lines.len()))
    }

    async fn choose_many(&self, _header: &str, lines: &[ChoiceLine]) -> Result<Vec<usize>> {
        self.shown.lock().unwrap().push(lines.to_vec());
        let choices = self.many.lock().unwrap().pop_front().unwrap_or_default();
        Ok(choices.into_iter().filter(|&i| i < lines.len()).collect())
    }
}
