//! Startup configuration.
//!
//! Built once in `main` and handed to backend constructors. Every field has
//! a default; environment variables override them:
//!
//! | variable                        | field                  | default                    |
//! |---------------------------------|------------------------|----------------------------|
//! | `CI_RESTART_NETRC`              | `credentials_path`     | `~/.authinfo`              |
//! | `CI_RESTART_JENKINS_URL`        | `jenkins_url`          | first `machine` in netrc   |
//! | `CI_RESTART_TRIGGER_PATTERNS`   | `trigger_job_patterns` | `job/github_trigger/job`   |
//! | `CI_RESTART_INSECURE_TLS`       | `insecure_tls`         | `true`                     |
//! | `CI_RESTART_PR_LIMIT`           | `pr_limit`             | `50`                       |
//! | `CI_RESTART_GH_BIN`             | `gh_bin`               | `gh`                       |
//! | `CI_RESTART_FZF_BIN`            | `fzf_bin`              | `fzf`                      |
//! | `CI_RESTART_HTTP_TIMEOUT_SECS`  | `http_timeout_secs`    | `30`                       |
//! | `CI_RESTART_LOG_FORMAT`         | `log_json` (`json`)    | text                       |
//!
//! A Jenkins host given without a scheme is reached over `http://`; write
//! `https://host` in either place to use TLS.

use std::path::PathBuf;

use directories::BaseDirs;
use tracing::warn;

use crate::credentials::Credentials;

pub const ENV_NETRC: &str = "CI_RESTART_NETRC";
pub const ENV_JENKINS_URL: &str = "CI_RESTART_JENKINS_URL";
pub const ENV_TRIGGER_PATTERNS: &str = "CI_RESTART_TRIGGER_PATTERNS";
pub const ENV_INSECURE_TLS: &str = "CI_RESTART_INSECURE_TLS";
pub const ENV_PR_LIMIT: &str = "CI_RESTART_PR_LIMIT";
pub const ENV_GH_BIN: &str = "CI_RESTART_GH_BIN";
pub const ENV_FZF_BIN: &str = "CI_RESTART_FZF_BIN";
pub const ENV_HTTP_TIMEOUT: &str = "CI_RESTART_HTTP_TIMEOUT_SECS";
pub const ENV_LOG_FORMAT: &str = "CI_RESTART_LOG_FORMAT";

/// URL fragment of the Jenkins job that dispatches builds from GitHub.
pub const DEFAULT_TRIGGER_PATTERN: &str = "job/github_trigger/job";
pub const DEFAULT_PR_LIMIT: usize = 50;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration for ci-restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestartConfig {
    /// netrc-format file with the Jenkins host and credentials.
    pub credentials_path: PathBuf,
    /// Explicit Jenkins base URL; wins over the credential file.
    pub jenkins_url: Option<String>,
    /// Jenkins statuses whose target URL contains any of these are never offered.
    pub trigger_job_patterns: Vec<String>,
    /// Accept invalid TLS certificates from Jenkins.
    pub insecure_tls: bool,
    pub pr_limit: usize,
    pub gh_bin: PathBuf,
    pub fzf_bin: PathBuf,
    pub http_timeout_secs: u64,
    pub log_json: bool,
}

impl Default for RestartConfig {
    fn default() -> Self {
        RestartConfig {
            credentials_path: default_credentials_path(),
            jenkins_url: None,
            trigger_job_patterns: vec![DEFAULT_TRIGGER_PATTERN.to_string()],
            insecure_tls: true,
            pr_limit: DEFAULT_PR_LIMIT,
            gh_bin: PathBuf::from("gh"),
            fzf_bin: PathBuf::from("fzf"),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            log_json: false,
        }
    }
}

impl RestartConfig {
    /// Defaults overridden by `CI_RESTART_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = get(ENV_NETRC) {
            config.credentials_path = PathBuf::from(path);
        }
        if let Some(url) = get(ENV_JENKINS_URL) {
            config.jenkins_url = Some(url);
        }
        if let Some(patterns) = get(ENV_TRIGGER_PATTERNS) {
            config.trigger_job_patterns = patterns
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(raw) = get(ENV_INSECURE_TLS) {
            match parse_bool(&raw) {
                Some(value) => config.insecure_tls = value,
                None => warn!(var = ENV_INSECURE_TLS, value = %raw, "ignoring non-boolean value"),
            }
        }
        if let Some(raw) = get(ENV_PR_LIMIT) {
            match raw.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => config.pr_limit = limit,
                _ => warn!(var = ENV_PR_LIMIT, value = %raw, "ignoring invalid limit"),
            }
        }
        if let Some(bin) = get(ENV_GH_BIN) {
            config.gh_bin = PathBuf::from(bin);
        }
        if let Some(bin) = get(ENV_FZF_BIN) {
            config.fzf_bin = PathBuf::from(bin);
        }
        if let Some(raw) = get(ENV_HTTP_TIMEOUT) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.http_timeout_secs = secs,
                _ => warn!(var = ENV_HTTP_TIMEOUT, value = %raw, "ignoring invalid timeout"),
            }
        }
        if let Some(format) = get(ENV_LOG_FORMAT) {
            config.log_json = format.eq_ignore_ascii_case("json");
        }

        config
    }

    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = path.into();
        self
    }

    pub fn with_jenkins_url(mut self, url: impl Into<String>) -> Self {
        self.jenkins_url = Some(url.into());
        self
    }

    pub fn with_trigger_job_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trigger_job_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Whether a Jenkins target URL belongs to a trigger (dispatch shim) job.
    pub fn is_trigger_job(&self, target_url: &str) -> bool {
        is_trigger_job(&self.trigger_job_patterns, target_url)
    }

    /// Jenkins base URL: the explicit setting, else the first machine of the
    /// credential file. Normalised to carry a scheme and no trailing slash.
    pub fn resolve_jenkins_url(&self, credentials: &Credentials) -> Option<String> {
        self.jenkins_url
            .as_deref()
            .or_else(|| credentials.first_machine())
            .map(normalize_base_url)
    }
}

/// Whether `target_url` contains any of the trigger-job `patterns`.
pub fn is_trigger_job(patterns: &[String], target_url: &str) -> bool {
    patterns
        .iter()
        .any(|p| !p.is_empty() && target_url.contains(p.as_str()))
}

/// A bare host (or `host:port`) is reached over plain http.
fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn default_credentials_path() -> PathBuf {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".authinfo"))
        .unwrap_or_else(|| PathBuf::from(".authinfo"))
}
