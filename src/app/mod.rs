//! Application runtime composition modules.

pub(crate) mod batch_tally;
pub(crate) mod config_runtime;
pub(crate) mod context;
pub(crate) mod download_orchestrator;
pub(crate) mod progress_display;
pub(crate) mod repl;
pub(crate) mod runtime;
pub(crate) mod terminal;
