//! Interactive command loop.

use std::io::{self, Write};

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use ir_downloader_core::SessionStats;

use crate::ProcessExit;
use crate::app::context::SessionContext;
use crate::app::download_orchestrator::{self, DownloadRun};
use crate::output;

/// One line of user input, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Exit,
    Stats,
    Download(String),
    Invalid,
    Empty,
}

/// Whether `input` starts with an `http://` or `https://` scheme (case-insensitive).
pub(crate) fn is_http_url(input: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        input
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

pub(crate) fn parse_command(line: &str) -> Command {
    let input = line.trim();
    if input.is_empty() {
        return Command::Empty;
    }
    match input.to_ascii_lowercase().as_str() {
        "exit" | "quit" | "q" => Command::Exit,
        "stats" => Command::Stats,
        _ if is_http_url(input) => Command::Download(input.to_string()),
        _ => Command::Invalid,
    }
}

fn print_prompt() -> Result<()> {
    println!();
    print!("{}", output::PROMPT);
    io::stdout().flush().context("Failed to flush stdout")
}

fn finish_session(ctx: &SessionContext, stats: &SessionStats) -> ProcessExit {
    output::print_stats(&stats.snapshot(), &ctx.output_dir);
    println!("{}", output::GOODBYE_MESSAGE);
    ProcessExit::Success
}

/// Reads commands from stdin until `exit`, end of input, or Ctrl-C.
pub(crate) async fn run_interactive(
    ctx: &SessionContext,
    stats: &mut SessionStats,
) -> Result<ProcessExit> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print_prompt()?;
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read from stdin")?,
            _ = tokio::signal::ctrl_c() => {
                return Ok(download_orchestrator::report_interrupted(ctx, stats));
            }
        };

        let Some(line) = line else {
            debug!("stdin closed");
            println!();
            return Ok(finish_session(ctx, stats));
        };

        match parse_command(&line) {
            Command::Empty => {}
            Command::Exit => return Ok(finish_session(ctx, stats)),
            Command::Stats => output::print_stats(&stats.snapshot(), &ctx.output_dir),
            Command::Invalid => output::print_invalid_input(),
            Command::Download(url) => {
                if download_orchestrator::download_one(ctx, &url, stats).await
                    == DownloadRun::Interrupted
                {
                    return Ok(download_orchestrator::report_interrupted(ctx, stats));
                }
            }
        }
    }
}
