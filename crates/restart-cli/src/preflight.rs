//! Required tool check, run before any other work.

use std::path::Path;

use restart_core::{RestartConfig, RestartError, Result};
use tracing::debug;

/// Fail with every missing tool named when `gh` or `fzf` cannot be found.
pub fn check_dependencies(config: &RestartConfig) -> Result<()> {
    check_tools(&[config.gh_bin.as_path(), config.fzf_bin.as_path()])
}

pub fn check_tools(tools: &[&Path]) -> Result<()> {
    let missing: Vec<String> = tools
        .iter()
        .filter(|tool| match which::which(tool) {
            Ok(found) => {
                debug!(tool = %tool.display(), path = %found.display(), "found tool");
                false
            }
            Err(_) => true,
        })
        .map(|tool| tool.display().to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(RestartError::MissingDependency(missing))
    }
}
