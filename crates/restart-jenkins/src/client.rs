//! Jenkins HTTP client
//!
//! Rebuilds go through the Rebuilder plugin endpoint
//! (`<build>/rebuild?autorebuild=true`) and need a CSRF crumb from
//! `<base>/crumbIssuer/api/json`. Both requests carry basic auth taken from
//! the netrc-format credential file, looked up by the request's host.

use std::path::Path;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};
use restart_core::{Credentials, RestartConfig, RestartError, Result, VERSION};
use serde::Deserialize;
use tracing::{debug, warn};

/// Header field Jenkins expects when `crumbRequestField` is absent.
pub const DEFAULT_CRUMB_FIELD: &str = "Jenkins-Crumb";

/// A CSRF crumb and the header it must be sent in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CrumbResponse {
    #[serde(default)]
    crumb: Option<String>,
    #[serde(default)]
    crumb_request_field: Option<String>,
}

/// Map a transport error onto the shared error type.
pub fn http_error(err: reqwest::Error) -> RestartError {
    RestartError::Http(err.to_string())
}

/// Rebuild endpoint for a build URL.
pub fn rebuild_url(build_url: &str) -> String {
    format!("{}/rebuild?autorebuild=true", build_url.trim_end_matches('/'))
}

/// Read the credential file, treating a missing or unreadable file as empty.
pub fn load_credentials(path: &Path) -> Credentials {
    match Credentials::load(path) {
        Ok(credentials) => credentials,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "credential file unavailable; Jenkins requests will be unauthenticated");
            Credentials::default()
        }
    }
}

pub struct JenkinsClient {
    http: Client,
    base_url: Option<String>,
    credentials: Credentials,
}

impl JenkinsClient {
    pub fn new(
        base_url: Option<String>,
        credentials: Credentials,
        insecure_tls: bool,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .user_agent(format!("ci-restart/{VERSION}"))
            .danger_accept_invalid_certs(insecure_tls)
            .timeout(timeout)
            .build()
            .map_err(http_error)?;

        Ok(JenkinsClient {
            http,
            base_url,
            credentials,
        })
    }

    /// Client for the configured Jenkins instance.
    ///
    /// The base URL is the explicit setting or the first `machine` of the
    /// credential file.
    pub fn from_config(config: &RestartConfig) -> Result<Self> {
        let credentials = load_credentials(&config.credentials_path);
        let base_url = config.resolve_jenkins_url(&credentials);
        if base_url.is_none() {
            warn!("no Jenkins URL configured; Jenkins restarts will fail");
        }
        Self::new(
            base_url,
            credentials,
            config.insecure_tls,
            Duration::from_secs(config.http_timeout_secs),
        )
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Attach basic auth for the URL's host when the credential file has it.
    fn authorized(&self, request: RequestBuilder, url: &Url) -> RequestBuilder {
        let entry = url
            .host_str()
            .and_then(|host| self.credentials.for_host(host));
        match entry.and_then(|e| e.login.as_deref().map(|login| (login, e.password.as_deref()))) {
            Some((login, password)) => request.basic_auth(login, password),
            None => {
                debug!(url = %url, "no credentials for host");
                request
            }
        }
    }

    /// Fetch a CSRF crumb from the crumb issuer.
    pub async fn crumb(&self) -> Result<Crumb> {
        let base = self
            .base_url
            .as_deref()
            .ok_or_else(|| RestartError::NotConfigured("Jenkins base URL".to_string()))?;
        let url = parse_url(&format!("{base}/crumbIssuer/api/json"))?;

        let response = self
            .authorized(self.http.get(url.clone()), &url)
            .send()
            .await
            .map_err(http_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(RestartError::Http(format!("crumb issuer returned {status}")));
        }

        let body: CrumbResponse = response.json().await.map_err(http_error)?;
        let value = body
            .crumb
            .filter(|c| !c.is_empty())
            .ok_or(RestartError::MissingCrumb)?;
        let field = body
            .crumb_request_field
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| DEFAULT_CRUMB_FIELD.to_string());

        Ok(Crumb { field, value })
    }

    /// Trigger a rebuild of `build_url` with the same parameters.
    pub async fn rebuild(&self, build_url: &str) -> Result<()> {
        let crumb = self.crumb().await?;
        let url = parse_url(&rebuild_url(build_url))?;

        let response = self
            .authorized(self.http.post(url.clone()), &url)
            .header(crumb.field.as_str(), crumb.value.as_str())
            .send()
            .await
            .map_err(http_error)?;
        let status = response.status();
        debug!(url = %url, status = %status, "rebuild requested");

        if status.is_success() {
            Ok(())
        } else {
            Err(RestartError::Http(format!("rebuild returned {status}")))
        }
    }
}

fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|err| RestartError::Http(format!("invalid URL {raw}: {err}")))
}
