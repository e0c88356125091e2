//! Body of the hidden `preview` subcommand that fzf runs for the
//! highlighted line.

use restart_core::{PreviewKey, Previewer};

/// Preview text for a raw key as fzf passes it.
///
/// `previewer` is only built once the key parses. Every failure is folded
/// into the returned text: fzf shows stdout in the pane whatever the exit
/// status, so the subcommand always exits 0.
pub async fn render_preview<P, F>(raw_key: &str, previewer: F) -> String
where
    P: Previewer,
    F: FnOnce() -> anyhow::Result<P>,
{
    let key: PreviewKey = match raw_key.parse() {
        Ok(key) => key,
        Err(err) => return format!("Preview unavailable: {err}"),
    };
    match previewer() {
        Ok(previewer) => previewer.preview(&key).await,
        Err(err) => format!("Preview unavailable: {err:#}"),
    }
}
