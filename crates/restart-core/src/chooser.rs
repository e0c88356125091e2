//! Interactive chooser seam.

use async_trait::async_trait;

use crate::error::Result;
use crate::preview::PreviewKey;

/// One selectable line plus the key its preview pane is rendered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceLine {
    pub display: String,
    pub preview: PreviewKey,
}

impl ChoiceLine {
    pub fn new(display: impl Into<String>, preview: PreviewKey) -> Self {
        ChoiceLine {
            display: display.into(),
            preview,
        }
    }
}

/// Fuzzy interactive selection over display lines.
///
/// Both methods return indices into `lines`. Cancellation is not an error:
/// `choose_one` yields `None` and `choose_many` an empty vector.
#[async_trait]
pub trait Chooser: Send + Sync {
    async fn choose_one(&self, header: &str, lines: &[ChoiceLine]) -> Result<Option<usize>>;

    async fn choose_many(&self, header: &str, lines: &[ChoiceLine]) -> Result<Vec<usize>>;
}
