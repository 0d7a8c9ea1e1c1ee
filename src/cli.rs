//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use ir_downloader_core::download::constants::{PROBE_TIMEOUT_SECS, TRANSFER_TIMEOUT_SECS};

/// Download files over HTTP(S) with live progress.
///
/// Without URLs, starts an interactive prompt that accepts one URL per line
/// plus the `stats` and `exit` commands. With URLs, downloads each of them
/// in order, prints session statistics, and exits.
#[derive(Parser, Debug, Clone)]
#[command(name = "ir-downloader")]
#[command(author, version, about)]
pub struct Args {
    /// URLs to download non-interactively
    pub urls: Vec<String>,

    /// Destination directory (default: platform download folder)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Timeout for the metadata probe in seconds (1-3600)
    #[arg(
        long,
        default_value_t = PROBE_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..=3600)
    )]
    pub probe_timeout: u64,

    /// Connect and read timeout for the transfer in seconds (1-3600)
    #[arg(
        long,
        default_value_t = TRANSFER_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..=3600)
    )]
    pub transfer_timeout: u64,

    /// Keep partially written files when a transfer fails
    #[arg(long)]
    pub keep_partial: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors and hide the progress bar
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable ANSI colors in log output
    #[arg(long)]
    pub no_color: bool,
}
