//! Source of review items (the code host's pull request queries).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::item::ReviewItem;

/// Title and description of one review item, used for previews.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemDetail {
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl ItemDetail {
    pub fn render(&self) -> String {
        format!("Title: {}\n\nBody:\n{}", self.title, self.body)
    }
}

/// Pull request queries against the code host.
#[async_trait]
pub trait ReviewSource: Send + Sync {
    /// Canonical `owner/name` of the repository in the working directory.
    async fn repository(&self) -> Result<String>;

    /// Up to `limit` open items authored by the current user.
    async fn list_open_items(&self, repo: &str, limit: usize) -> Result<Vec<ReviewItem>>;

    async fn item_detail(&self, repo: &str, number: u64) -> Result<ItemDetail>;

    /// Current head commit of an item, `None` when the host reports none.
    async fn head_sha(&self, repo: &str, number: u64) -> Result<Option<String>>;
}
