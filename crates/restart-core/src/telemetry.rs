//! Logging setup.
//!
//! While a session runs, fzf owns the terminal and stdout carries the
//! progress lines the operator reads, so log records can only go to stderr.
//! The preview subcommand is the sharper case: fzf paints whatever it prints
//! into the preview pane, which is why `main` starts it at `error` level.

use std::io;

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` wins over `level`. With `json` every record is one JSON
/// object per line. Later calls are no-ops.
pub fn init_tracing(json: bool, level: Level) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| quiet_filter(level));

    let output = fmt::layer().with_target(false).with_writer(io::stderr);
    let output = if json {
        output.json().boxed()
    } else {
        output.boxed()
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(output)
        .try_init();
}

fn quiet_filter(level: Level) -> EnvFilter {
    EnvFilter::new(level.as_str())
}
