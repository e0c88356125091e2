//! netrc / authinfo credential file parsing.
//!
//! Supports the `machine`, `default`, `login`, `password`, `account` and
//! `port` tokens. A `macdef` ends parsing since macro bodies are free text.

use std::path::Path;

use tracing::debug;

use crate::error::Result;

/// One `machine` (or `default`) block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NetrcEntry {
    /// `None` for the `default` entry.
    pub machine: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
}

/// Parsed credential file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    entries: Vec<NetrcEntry>,
}

impl Credentials {
    pub fn parse(text: &str) -> Self {
        let mut entries: Vec<NetrcEntry> = Vec::new();
        let mut tokens = text
            .lines()
            .filter(|line| !line.trim_start().starts_with('#'))
            .flat_map(str::split_whitespace);

        while let Some(token) = tokens.next() {
            match token {
                "machine" => entries.push(NetrcEntry {
                    machine: tokens.next().map(str::to_string),
                    ..NetrcEntry::default()
                }),
                "default" => entries.push(NetrcEntry::default()),
                "login" => {
                    let value = tokens.next().map(str::to_string);
                    if let Some(entry) = entries.last_mut() {
                        entry.login = value;
                    }
                }
                "password" => {
                    let value = tokens.next().map(str::to_string);
                    if let Some(entry) = entries.last_mut() {
                        entry.password = value;
                    }
                }
                "account" | "port" => {
                    tokens.next();
                }
                "macdef" => break,
                _ => {}
            }
        }

        Credentials { entries }
    }

    /// Read and parse a credential file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let credentials = Self::parse(&text);
        debug!(path = %path.display(), entries = credentials.entries.len(), "loaded credentials");
        Ok(credentials)
    }

    /// Host of the first `machine` entry.
    pub fn first_machine(&self) -> Option<&str> {
        self.entries.iter().find_map(|e| e.machine.as_deref())
    }

    /// Entry for `host`, falling back to the `default` entry.
    pub fn for_host(&self, host: &str) -> Option<&NetrcEntry> {
        self.entries
            .iter()
            .find(|e| {
                e.machine
                    .as_deref()
                    .is_some_and(|m| m.eq_ignore_ascii_case(host) || host_of(m).eq_ignore_ascii_case(host))
            })
            .or_else(|| self.entries.iter().find(|e| e.machine.is_none()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Host part of a machine value written as a URL or as `host:port`.
fn host_of(machine: &str) -> &str {
    let rest = machine.split_once("://").map_or(machine, |(_, rest)| rest);
    let authority = rest.split('/').next().unwrap_or(rest);
    authority.split(':').next().unwrap_or(authority)
}
