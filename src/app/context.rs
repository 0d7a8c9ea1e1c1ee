//! Shared session context built after CLI/config handling.

use std::path::PathBuf;

use ir_downloader_core::DownloadEngine;

/// Holds what every command of the session needs, so the loop and the
/// one-shot runner can pass a single reference around.
pub(crate) struct SessionContext {
    pub(crate) engine: DownloadEngine,
    pub(crate) output_dir: PathBuf,
    pub(crate) show_progress_bar: bool,
}
