//! ci-restart core library
//!
//! Domain model and backend-agnostic logic for restarting failing CI jobs:
//! - `item`: pull requests and check-state aggregation
//! - `task`: CI sub-tasks (workflow runs, Jenkins builds)
//! - `backend`: the `CiBackend` capability trait and its registry
//! - `fetch` / `dispatch`: collecting sub-tasks and restarting a selection
//! - `chooser` / `preview`: seams for the interactive selection UI
//! - `config` / `credentials`: startup configuration and netrc parsing
//!
//! In-memory fakes for every trait live in `fakes`.

pub mod backend;
pub mod chooser;
pub mod config;
pub mod credentials;
pub mod dispatch;
pub mod error;
pub mod fakes;
pub mod fetch;
pub mod item;
pub mod preview;
pub mod source;
pub mod task;
pub mod telemetry;

pub use backend::{BackendRegistry, CiBackend};
pub use chooser::{ChoiceLine, Chooser};
pub use config::RestartConfig;
pub use credentials::{Credentials, NetrcEntry};
pub use dispatch::{restart_all, DispatchEvent, DispatchReport, RestartOutcome, Tally};
pub use error::{RestartError, Result};
pub use fetch::collect_subtasks;
pub use item::{CheckFamily, CheckState, CheckSummary, ReviewItem};
pub use preview::{PreviewKey, Previewer, SourcePreviewer};
pub use source::{ItemDetail, ReviewSource};
pub use task::{BackendKind, SubTask, SubTaskState};
pub use telemetry::init_tracing;

/// ci-restart version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
