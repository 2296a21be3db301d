//! CLI command handlers, one file per command.

mod ask;
mod completions;
mod resources;

pub use ask::{run_ask, AskKind};
pub use completions::run_completions;
pub use resources::{outcome_lines, render_resources, run_resources, RetryOverrides};
