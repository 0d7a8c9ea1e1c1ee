//! CLI parsing with value sources, and merging of the config file into the CLI arguments.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgMatches, CommandFactory, FromArgMatches, parser::ValueSource};
use ir_downloader_core::{DownloaderConfig, PartialFilePolicy, Platform};

use crate::app_config::{FileConfig, VerbositySetting};
use crate::cli::Args;

/// Which arguments were given explicitly on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CliValueSources {
    pub(crate) output_dir: bool,
    pub(crate) probe_timeout: bool,
    pub(crate) transfer_timeout: bool,
    pub(crate) keep_partial: bool,
    pub(crate) verbose: bool,
    pub(crate) quiet: bool,
}

pub(crate) fn parse_cli_with_sources() -> (Args, CliValueSources) {
    let matches = Args::command().get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());
    let sources = sources_from_matches(&matches);
    (args, sources)
}

fn sources_from_matches(matches: &ArgMatches) -> CliValueSources {
    CliValueSources {
        output_dir: is_commandline_value(matches, "output_dir"),
        probe_timeout: is_commandline_value(matches, "probe_timeout"),
        transfer_timeout: is_commandline_value(matches, "transfer_timeout"),
        keep_partial: is_commandline_value(matches, "keep_partial"),
        verbose: is_commandline_value(matches, "verbose"),
        quiet: is_commandline_value(matches, "quiet"),
    }
}

fn is_commandline_value(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(ValueSource::CommandLine)
}

/// Fills every argument not given on the command line from the config file.
pub(crate) fn apply_config_defaults(
    mut args: Args,
    cli_sources: &CliValueSources,
    file_config: Option<&FileConfig>,
) -> Args {
    let Some(file_config) = file_config else {
        return args;
    };

    if !cli_sources.output_dir
        && let Some(output_dir) = &file_config.output_dir
    {
        args.output_dir = Some(output_dir.clone());
    }

    if !cli_sources.probe_timeout
        && let Some(secs) = file_config.probe_timeout_secs
    {
        args.probe_timeout = secs;
    }

    if !cli_sources.transfer_timeout
        && let Some(secs) = file_config.transfer_timeout_secs
    {
        args.transfer_timeout = secs;
    }

    if !cli_sources.keep_partial
        && let Some(keep_partial) = file_config.keep_partial
    {
        args.keep_partial = keep_partial;
    }

    if !cli_sources.verbose
        && !cli_sources.quiet
        && let Some(verbosity) = file_config.verbosity
    {
        apply_config_verbosity(&mut args, verbosity);
    }

    args
}

fn apply_config_verbosity(args: &mut Args, verbosity: VerbositySetting) {
    match verbosity {
        VerbositySetting::Default => {
            args.verbose = 0;
            args.quiet = false;
        }
        VerbositySetting::Verbose => {
            args.verbose = 1;
            args.quiet = false;
        }
        VerbositySetting::Debug => {
            args.verbose = 2;
            args.quiet = false;
        }
        VerbositySetting::Quiet => {
            args.verbose = 0;
            args.quiet = true;
        }
    }
}

/// Default tracing filter for the merged arguments.
pub(crate) fn resolve_default_log_level(args: &Args) -> &'static str {
    if args.quiet {
        return "error";
    }
    match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Explicit `-v`/`-q` beats `RUST_LOG`.
pub(crate) fn should_force_cli_log_level(cli_sources: &CliValueSources) -> bool {
    cli_sources.verbose || cli_sources.quiet
}

/// Builds the library configuration from merged arguments.
///
/// Without `--output-dir` the platform download folder is used.
pub(crate) fn build_downloader_config(args: &Args) -> Result<DownloaderConfig> {
    let output_dir: PathBuf = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => Platform::current()
            .default_download_dir()
            .context("Could not determine the home directory; pass --output-dir")?,
    };
    Ok(DownloaderConfig {
        output_dir,
        probe_timeout_secs: args.probe_timeout,
        transfer_timeout_secs: args.transfer_timeout,
        partial_policy: if args.keep_partial {
            PartialFilePolicy::Keep
        } else {
            PartialFilePolicy::Remove
        },
    })
}
