//! fzf-backed chooser.
//!
//! Every input line is `<index>\t<preview key>\t<display>`. fzf shows only
//! the display column (`--with-nth=3..`), hands the preview key to the
//! preview command as `{2}`, and prints the full line back for each
//! selection, so the index is all that needs parsing.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use restart_core::{ChoiceLine, Chooser, RestartError, Result};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// fzf exit code when nothing matched the query.
const EXIT_NO_MATCH: i32 = 1;
/// fzf exit code for ESC / Ctrl-C.
const EXIT_INTERRUPTED: i32 = 130;

pub struct FzfChooser {
    binary: PathBuf,
    preview_command: Option<String>,
}

impl FzfChooser {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        FzfChooser {
            binary: binary.into(),
            preview_command: None,
        }
    }

    /// Shell command fzf runs for the highlighted line; `{2}` expands to its
    /// preview key.
    pub fn with_preview_command(mut self, command: impl Into<String>) -> Self {
        self.preview_command = Some(command.into());
        self
    }

    fn base_args(&self, header: &str) -> Vec<String> {
        let mut args = vec![
            "--ansi".to_string(),
            format!("--header={header}"),
            "--delimiter=\t".to_string(),
            "--with-nth=3..".to_string(),
        ];
        if let Some(command) = &self.preview_command {
            args.push(format!("--preview={command}"));
        }
        args
    }

    pub fn single_args(&self, header: &str) -> Vec<String> {
        let mut args = self.base_args(header);
        args.push("--preview-window=right:60%:wrap".to_string());
        args
    }

    pub fn multi_args(&self, header: &str) -> Vec<String> {
        let mut args = vec![
            "-m".to_string(),
            "--bind".to_string(),
            "ctrl-a:select-all".to_string(),
            "--marker".to_string(),
            "↻ ".to_string(),
            "--color".to_string(),
            "marker:yellow".to_string(),
        ];
        args.extend(self.base_args(header));
        args.push("--preview-window=right:50%:wrap".to_string());
        args
    }

    /// Run fzf over `lines`; `None` when the operator cancelled.
    async fn run(&self, args: Vec<String>, lines: &[ChoiceLine]) -> Result<Option<Vec<usize>>> {
        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|err| match err.kind() {
                std::io::ErrorKind::NotFound => {
                    RestartError::MissingDependency(vec![self.binary.display().to_string()])
                }
                _ => RestartError::Chooser(format!("failed to start fzf: {err}")),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // fzf may exit before reading everything.
            if let Err(err) = stdin.write_all(build_input(lines).as_bytes()).await {
                if err.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(err.into());
                }
            }
        }

        let output = child.wait_with_output().await?;
        match output.status.code() {
            Some(0) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                Ok(Some(parse_selection(&stdout, lines.len())))
            }
            Some(EXIT_NO_MATCH) | Some(EXIT_INTERRUPTED) => {
                debug!(code = ?output.status.code(), "fzf cancelled");
                Ok(None)
            }
            Some(code) => Err(RestartError::Chooser(format!("fzf exited with status {code}"))),
            None => Err(RestartError::Chooser("fzf was terminated by a signal".to_string())),
        }
    }
}

#[async_trait]
impl Chooser for FzfChooser {
    async fn choose_one(&self, header: &str, lines: &[ChoiceLine]) -> Result<Option<usize>> {
        let selected = self.run(self.single_args(header), lines).await?;
        Ok(selected.and_then(|indices| indices.into_iter().next()))
    }

    async fn choose_many(&self, header: &str, lines: &[ChoiceLine]) -> Result<Vec<usize>> {
        let selected = self.run(self.multi_args(header), lines).await?;
        Ok(selected.unwrap_or_default())
    }
}

/// fzf stdin for `lines`.
pub fn build_input(lines: &[ChoiceLine]) -> String {
    lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            // Tabs or newlines in a title would shift the columns.
            let display = line.display.replace(['\t', '\n'], " ");
            format!("{index}\t{}\t{display}\n", line.preview)
        })
        .collect()
}

/// Indices of the selected lines, in selection order, without duplicates.
pub fn parse_selection(stdout: &str, len: usize) -> Vec<usize> {
    let mut indices = Vec::new();
    for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
        let parsed = line
            .split('\t')
            .next()
            .and_then(|field| field.trim().parse::<usize>().ok())
            .filter(|&index| index < len);
        match parsed {
            Some(index) if !indices.contains(&index) => indices.push(index),
            Some(_) => {}
            None => debug!(line = %line, "ignoring unparsable fzf output"),
        }
    }
    indices
}

/// Preview command invoking this executable's hidden `preview` subcommand.
pub fn preview_command(exe: &Path, repo: &str) -> String {
    format!(
        "{} preview --repo {} {{2}}",
        shell_quote(&exe.to_string_lossy()),
        shell_quote(repo)
    )
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
