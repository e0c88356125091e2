//! Typed preview callbacks for the chooser.
//!
//! A chooser line carries a `PreviewKey`; rendering a preview is a call to
//! `Previewer::preview` with that key. External choosers that run previews
//! in a separate process pass the key in its `Display` form and parse it
//! back with `FromStr`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::backend::BackendRegistry;
use crate::error::RestartError;
use crate::source::ReviewSource;
use crate::task::BackendKind;

const ITEM_PREFIX: &str = "pr";

/// What a preview pane should show.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PreviewKey {
    /// A review item by number.
    Item(u64),

    /// A sub-task by backend and backend id.
    Task { backend: BackendKind, id: String },
}

impl std::fmt::Display for PreviewKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreviewKey::Item(number) => write!(f, "{ITEM_PREFIX}:{number}"),
            PreviewKey::Task { backend, id } => write!(f, "{}:{}", backend.tag(), id),
        }
    }
}

impl std::str::FromStr for PreviewKey {
    type Err = RestartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RestartError::InvalidPreviewKey(s.to_string());
        let (prefix, rest) = s.trim().split_once(':').ok_or_else(invalid)?;
        if rest.is_empty() {
            return Err(invalid());
        }

        if prefix == ITEM_PREFIX {
            return rest.parse().map(PreviewKey::Item).map_err(|_| invalid());
        }

        let backend = prefix.parse::<BackendKind>().map_err(|_| invalid())?;
        Ok(PreviewKey::Task {
            backend,
            id: rest.to_string(),
        })
    }
}

/// Renders preview text. Never fails: problems become the preview text.
#[async_trait]
pub trait Previewer: Send + Sync {
    async fn preview(&self, key: &PreviewKey) -> String;
}

/// Previewer backed by the review source and the registered backends.
pub struct SourcePreviewer {
    source: Arc<dyn ReviewSource>,
    registry: BackendRegistry,
    repo: String,
}

impl SourcePreviewer {
    pub fn new(source: Arc<dyn ReviewSource>, registry: BackendRegistry, repo: impl Into<String>) -> Self {
        SourcePreviewer {
            source,
            registry,
            repo: repo.into(),
        }
    }
}

#[async_trait]
impl Previewer for SourcePreviewer {
    async fn preview(&self, key: &PreviewKey) -> String {
        let rendered = match key {
            PreviewKey::Item(number) => self
                .source
                .item_detail(&self.repo, *number)
                .await
                .map(|detail| detail.render()),
            PreviewKey::Task { backend, id } => match self.registry.get(*backend) {
                Some(b) => b.describe(id).await,
                None => Err(RestartError::UnknownBackend(*backend)),
            },
        };

        rendered.unwrap_or_else(|err| {
            debug!(key = %key, error = %err, "preview unavailable");
            format!("Preview unavailable: {err}")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{MemoryBackend, MemoryReviewSource};
    use crate::source::ItemDetail;

    #[test]
    fn parses_item_and_task_keys() {
        assert_eq!("pr:42".parse::<PreviewKey>().unwrap(), PreviewKey::Item(42));
        assert_eq!(
            "jenkins:https://ci.example/job/lint/42/\t"
                .parse::<PreviewKey>()
                .unwrap(),
            PreviewKey::Task {
                backend: BackendKind::Jenkins,
                id: "https://ci.example/job/lint/42/".to_string(),
            }
        );
    }

    #[test]
    fn rejects_malformed_keys() {
        for raw in ["", "pr", "pr:", "pr:abc", "gitlab:1", "github:"] {
            assert!(raw.parse::<PreviewKey>().is_err(), "accepted {raw:?}");
        }
    }

    #[test]
    fn display_matches_parse() {
        let key = PreviewKey::Task {
            backend: BackendKind::GithubActions,
            id: "555".to_string(),
        };
        assert_eq!(key.to_string(), "github:555");
        assert_eq!(key.to_string().parse::<PreviewKey>().unwrap(), key);
    }

    #[tokio::test]
    async fn item_preview_renders_detail() {
        let source = MemoryReviewSource::new("octo/repo").with_detail(
            42,
            ItemDetail {
                title: "Fix flaky test".to_string(),
                body: "Body text".to_string(),
            },
        );
        let previewer = SourcePreviewer::new(Arc::new(source), BackendRegistry::new(), "octo/repo");

        let text = previewer.preview(&PreviewKey::Item(42)).await;
        assert_eq!(text, "Title: Fix flaky test\n\nBody:\nBody text");
    }

    #[tokio::test]
    async fn preview_failure_becomes_text() {
        let source = MemoryReviewSource::new("octo/repo");
        let previewer = SourcePreviewer::new(Arc::new(source), BackendRegistry::new(), "octo/repo");

        let text = previewer.preview(&PreviewKey::Item(7)).await;
        assert!(text.starts_with("Preview unavailable"));

        let text = previewer
            .preview(&PreviewKey::Task {
                backend: BackendKind::Jenkins,
                id: "x".to_string(),
            })
            .await;
        assert!(text.contains("no backend registered for jenkins"));
    }

    #[tokio::test]
    async fn task_preview_delegates_to_backend() {
        let registry = BackendRegistry::new().register(Arc::new(
            MemoryBackend::new(BackendKind::GithubActions).with_description("555", "build: failure"),
        ));
        let previewer = SourcePreviewer::new(
            Arc::new(MemoryReviewSource::new("octo/repo")),
            registry,
            "octo/repo",
        );

        let text = previewer
            .preview(&PreviewKey::Task {
                backend: BackendKind::GithubActions,
                id: "555".to_string(),
            })
            .await;
        assert_eq!(text, "build: failure");
    }
}
