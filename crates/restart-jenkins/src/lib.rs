//! Jenkins side of ci-restart: build discovery via commit statuses and
//! rebuilds over HTTP.

pub mod backend;
pub mod client;

pub use backend::{failing_jobs, JenkinsBackend};
pub use client::{load_credentials, rebuild_url, Crumb, JenkinsClient};
