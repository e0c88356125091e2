//! Error taxonomy for ci-restart.

use crate::task::BackendKind;

/// Errors produced while listing, previewing or restarting CI work.
#[derive(Debug, thiserror::Error)]
pub enum RestartError {
    #[error("missing required tools: {}", .0.join(", "))]
    MissingDependency(Vec<String>),

    #[error("could not determine head SHA for PR #{0}")]
    MissingHeadSha(u64),

    #[error("command failed (`{command}`): {detail}")]
    Command { command: String, detail: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Jenkins did not issue a crumb")]
    MissingCrumb,

    #[error("{0} is not configured")]
    NotConfigured(String),

    #[error("no backend registered for {0}")]
    UnknownBackend(BackendKind),

    #[error("invalid preview key: {0}")]
    InvalidPreviewKey(String),

    #[error("chooser failed: {0}")]
    Chooser(String),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ci-restart operations.
pub type Result<T> = std::result::Result<T, RestartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dependency_lists_tools() {
        let err = RestartError::MissingDependency(vec!["gh".to_string(), "fzf".to_string()]);
        assert_eq!(err.to_string(), "missing required tools: gh, fzf");
    }

    #[test]
    fn test_command_error_display() {
        let err = RestartError::Command {
            command: "gh run rerun 555".to_string(),
            detail: "HTTP 403".to_string(),
        };
        assert!(err.to_string().contains("gh run rerun 555"));
        assert!(err.to_string().contains("HTTP 403"));
    }

    #[test]
    fn test_unknown_backend_names_kind() {
        let err = RestartError::UnknownBackend(BackendKind::Jenkins);
        assert_eq!(err.to_string(), "no backend registered for jenkins");
    }
}
