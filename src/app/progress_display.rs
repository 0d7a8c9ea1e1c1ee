//! Terminal rendering of download events.

use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use ir_downloader_core::download::constants::PROGRESS_BAR_WIDTH;
use ir_downloader_core::download::{ProgressSink, TransferReport};
use ir_downloader_core::{ProbeOutcome, TransferProgress};

use crate::output;

/// Final line drawn over the live bar once the body is written.
pub(crate) fn complete_line() -> String {
    format!("[{}] 100.0% | Complete!", "█".repeat(PROGRESS_BAR_WIDTH))
}

/// Prints probe results and drives a single-line indicatif bar.
///
/// The bar is created on the first progress update, so transfers of unknown
/// size never draw one.
pub(crate) struct TerminalProgress {
    show_bar: bool,
    bar: Option<ProgressBar>,
    target: Option<PathBuf>,
}

impl TerminalProgress {
    pub(crate) fn new(show_bar: bool) -> Self {
        Self {
            show_bar,
            bar: None,
            target: None,
        }
    }

    /// Destination chosen for the current download, once resolved.
    pub(crate) fn target(&self) -> Option<&Path> {
        self.target.as_deref()
    }

    fn bar(&mut self) -> &ProgressBar {
        self.bar.get_or_insert_with(|| {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar
        })
    }
}

impl ProgressSink for TerminalProgress {
    fn resolved(&mut self, probe: &ProbeOutcome, target: &Path) {
        self.target = Some(target.to_path_buf());
        output::print_probe(probe, target);
        let metadata = probe.metadata();
        println!("Downloading {}: {}", metadata.category, metadata.filename);
    }

    fn report(&mut self, progress: &TransferProgress) {
        if self.show_bar {
            let line = progress.render_line();
            self.bar().set_message(line);
        }
    }

    fn finish(&mut self, _report: &TransferReport) {
        if let Some(bar) = self.bar.take() {
            bar.finish_with_message(complete_line());
        }
    }
}

impl Drop for TerminalProgress {
    fn drop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.abandon();
        }
    }
}
