//! Runs single downloads for the session, with Ctrl-C cancellation, and the one-shot batch mode.

use tracing::debug;

use ir_downloader_core::{DownloadOutcome, SessionStats};

use crate::ProcessExit;
use crate::app::context::SessionContext;
use crate::app::batch_tally::BatchTally;
use crate::app::progress_display::TerminalProgress;
use crate::app::repl::is_http_url;
use crate::output;

/// How a single download ended from the session's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DownloadRun {
    Succeeded,
    Failed,
    Interrupted,
}

/// Downloads one URL, printing progress and the result.
///
/// Ctrl-C drops the transfer; the partial file is then handled like a
/// failed transfer would be.
pub(crate) async fn download_one(
    ctx: &SessionContext,
    url: &str,
    stats: &mut SessionStats,
) -> DownloadRun {
    let mut display = TerminalProgress::new(ctx.show_progress_bar);
    let outcome = tokio::select! {
        outcome = ctx.engine.resolve_and_download(url, stats, &mut display) => Some(outcome),
        _ = tokio::signal::ctrl_c() => None,
    };

    match outcome {
        Some(DownloadOutcome::Succeeded(done)) => {
            drop(display);
            output::print_success(&done);
            DownloadRun::Succeeded
        }
        Some(DownloadOutcome::Failed(failed)) => {
            drop(display);
            output::print_failure(&failed);
            DownloadRun::Failed
        }
        None => {
            if let Some(target) = display.target().map(std::path::Path::to_path_buf) {
                drop(display);
                let removed = ctx.engine.discard_partial(&target).await;
                debug!(path = %target.display(), removed, "transfer interrupted");
            }
            DownloadRun::Interrupted
        }
    }
}

/// Prints the interruption notice and the statistics report.
pub(crate) fn report_interrupted(ctx: &SessionContext, stats: &SessionStats) -> ProcessExit {
    println!();
    println!("{}", output::INTERRUPTED_MESSAGE);
    output::print_stats(&stats.snapshot(), &ctx.output_dir);
    ProcessExit::Interrupted
}

/// Downloads every URL in order, then prints statistics.
pub(crate) async fn run_batch(
    ctx: &SessionContext,
    urls: &[String],
    stats: &mut SessionStats,
) -> ProcessExit {
    let mut tally = BatchTally::default();

    for url in urls {
        let url = url.trim();
        if !is_http_url(url) {
            println!("{url}: {}", output::INVALID_INPUT_MESSAGE);
            tally.record_rejected();
            continue;
        }
        let run = download_one(ctx, url, stats).await;
        tally.record(run);
        if run == DownloadRun::Interrupted {
            return report_interrupted(ctx, stats);
        }
    }

    output::print_stats(&stats.snapshot(), &ctx.output_dir);
    tally.exit()
}
