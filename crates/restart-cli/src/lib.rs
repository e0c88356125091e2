//! Interactive front end of ci-restart: fzf chooser, display lines and the
//! session workflow. The `ci-restart` binary wires these to the real
//! GitHub and Jenkins backends.

pub mod fzf;
pub mod preflight;
pub mod preview;
pub mod render;
pub mod workflow;

pub use fzf::FzfChooser;
pub use preview::render_preview;
pub use workflow::{RestartWorkflow, WorkflowOutcome};
