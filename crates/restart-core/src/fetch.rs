//! Sub-task collection across all registered backends.

use tracing::{debug, warn};

use crate::backend::BackendRegistry;
use crate::task::SubTask;

/// Collect failing or pending jobs for `sha` from every backend, in
/// registration order.
///
/// Backends are queried one at a time. A backend whose listing fails
/// contributes nothing; the failure is logged and the others still run.
pub async fn collect_subtasks(registry: &BackendRegistry, sha: &str) -> Vec<SubTask> {
    let mut tasks = Vec::new();
    for backend in registry.iter() {
        match backend.list_failing_or_pending(sha).await {
            Ok(found) => {
                debug!(backend = %backend.kind(), sha = %sha, count = found.len(), "listed sub-tasks");
                tasks.extend(found);
            }
            Err(err) => {
                warn!(backend = %backend.kind(), sha = %sha, error = %err, "failed to list sub-tasks");
            }
        }
    }
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{sample_task, MemoryBackend};
    use crate::task::BackendKind;
    use std::sync::Arc;

    #[tokio::test]
    async fn concatenates_in_registration_order() {
        let registry = BackendRegistry::new()
            .register(Arc::new(
                MemoryBackend::new(BackendKind::GithubActions)
                    .with_task(sample_task(BackendKind::GithubActions, "555", "build")),
            ))
            .register(Arc::new(
                MemoryBackend::new(BackendKind::Jenkins)
                    .with_task(sample_task(BackendKind::Jenkins, "https://ci.example/job/lint/42/", "lint")),
            ));

        let tasks = collect_subtasks(&registry, "abc123").await;
        let ids: Vec<_> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["555", "https://ci.example/job/lint/42/"]);
    }

    #[tokio::test]
    async fn failing_backend_contributes_nothing() {
        let registry = BackendRegistry::new()
            .register(Arc::new(MemoryBackend::new(BackendKind::GithubActions).failing_list()))
            .register(Arc::new(
                MemoryBackend::new(BackendKind::Jenkins)
                    .with_task(sample_task(BackendKind::Jenkins, "https://ci.example/job/a/1/", "a")),
            ));

        let tasks = collect_subtasks(&registry, "abc123").await;
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].backend, BackendKind::Jenkins);
    }

    #[tokio::test]
    async fn empty_backends_yield_empty_list() {
        let registry = BackendRegistry::new()
            .register(Arc::new(MemoryBackend::new(BackendKind::GithubActions)))
            .register(Arc::new(MemoryBackend::new(BackendKind::Jenkins)));

        assert!(collect_subtasks(&registry, "abc123").await.is_empty());
    }
}
