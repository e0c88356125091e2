//! ci-restart - restart failing CI jobs on your open pull requests
//!
//! Pick one of your open PRs, pick any of its failed or still-running
//! GitHub Actions runs and Jenkins builds, and have them restarted.
//!
//! Run it inside a clone of the repository. Requires an authenticated `gh`
//! and `fzf`; Jenkins credentials come from `~/.authinfo` (netrc format).

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use restart_core::{init_tracing, BackendRegistry, RestartConfig, SourcePreviewer};
use restart_github::{GhCli, GithubActionsBackend};
use restart_jenkins::{JenkinsBackend, JenkinsClient};
use tracing::Level;

use restart_cli::fzf::preview_command;
use restart_cli::preflight::check_dependencies;
use restart_cli::{render_preview, FzfChooser, RestartWorkflow};

#[derive(Parser)]
#[command(name = "ci-restart")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interactively restart failed or pending CI jobs on your open pull requests", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a chooser preview pane (invoked by fzf)
    #[command(hide = true)]
    Preview {
        #[arg(long)]
        repo: String,

        /// Preview key of the highlighted line
        key: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = RestartConfig::from_env();

    match cli.command {
        Some(Commands::Preview { repo, key }) => {
            // Anything logged here would land in the preview pane.
            init_tracing(config.log_json, Level::ERROR);
            cmd_preview(&config, &repo, &key).await;
            Ok(ExitCode::SUCCESS)
        }
        None => {
            init_tracing(config.log_json, Level::WARN);
            tokio::select! {
                result = cmd_restart(&config) => result.map(|()| ExitCode::SUCCESS),
                _ = tokio::signal::ctrl_c() => {
                    println!("\nOperation cancelled by user.");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

/// Backends for `repo`, Actions first.
fn build_registry(config: &RestartConfig, gh: &Arc<GhCli>, repo: &str) -> Result<BackendRegistry> {
    let jenkins = JenkinsClient::from_config(config).context("Failed to create Jenkins client")?;
    Ok(BackendRegistry::new()
        .register(Arc::new(GithubActionsBackend::new(gh.clone(), repo)))
        .register(Arc::new(JenkinsBackend::new(
            gh.clone(),
            repo,
            Arc::new(jenkins),
            config.trigger_job_patterns.clone(),
        ))))
}

async fn cmd_restart(config: &RestartConfig) -> Result<()> {
    check_dependencies(config)?;

    let gh = Arc::new(GhCli::from_config(config));
    let repo = gh
        .repository()
        .await
        .context("Error getting repository info")?;
    println!("Repository: {repo}");

    let registry = build_registry(config, &gh, &repo)?;
    let exe = std::env::current_exe().context("Failed to locate the ci-restart executable")?;
    let chooser = FzfChooser::new(&config.fzf_bin).with_preview_command(preview_command(&exe, &repo));

    let workflow = RestartWorkflow::new(gh, registry, Arc::new(chooser), repo, config.pr_limit);
    let mut stdout = std::io::stdout();
    workflow.run(&mut stdout).await?;
    Ok(())
}

async fn cmd_preview(config: &RestartConfig, repo: &str, key: &str) {
    let text = render_preview(key, || {
        let gh = Arc::new(GhCli::from_config(config));
        let registry = build_registry(config, &gh, repo)?;
        Ok(SourcePreviewer::new(gh, registry, repo))
    })
    .await;
    println!("{text}");
}
