//! CI backend capability trait and registry.
//!
//! The fetcher and the dispatcher only talk to `CiBackend`; they never
//! branch on which CI system a sub-task came from.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::task::{BackendKind, SubTask};

/// A CI system that can report and restart jobs for a commit.
#[async_trait]
pub trait CiBackend: Send + Sync {
    /// Which backend tag this implementation owns.
    fn kind(&self) -> BackendKind;

    /// Jobs on `sha` that failed or have not finished yet.
    async fn list_failing_or_pending(&self, sha: &str) -> Result<Vec<SubTask>>;

    /// Request a restart of one job. No retry is attempted.
    async fn restart(&self, task: &SubTask) -> Result<()>;

    /// Human-readable detail for the job with the given backend id.
    async fn describe(&self, id: &str) -> Result<String>;
}

/// Ordered set of registered backends.
///
/// Registration order is the order sub-tasks are listed in.
#[derive(Clone, Default)]
pub struct BackendRegistry {
    backends: Vec<Arc<dyn CiBackend>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a backend, replacing any previously registered one of the same kind.
    pub fn register(mut self, backend: Arc<dyn CiBackend>) -> Self {
        let kind = backend.kind();
        self.backends.retain(|b| b.kind() != kind);
        self.backends.push(backend);
        self
    }

    pub fn get(&self, kind: BackendKind) -> Option<&Arc<dyn CiBackend>> {
        self.backends.iter().find(|b| b.kind() == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn CiBackend>> {
        self.backends.iter()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.backends.iter().map(|b| b.kind()))
            .finish()
    }
}
