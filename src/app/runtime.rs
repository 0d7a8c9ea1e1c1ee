//! Startup: configuration, logging, output directory, then the interactive or one-shot session.

use std::fs;

use anyhow::{Context, Result};
use tracing::{debug, info};

use ir_downloader_core::{DownloadEngine, SessionStats};

use crate::ProcessExit;
use crate::app::context::SessionContext;
use crate::app::{config_runtime, download_orchestrator, repl, terminal};
use crate::app_config::load_default_file_config;
use crate::output;

pub(crate) async fn run_downloader() -> Result<ProcessExit> {
    let (args, cli_sources) = config_runtime::parse_cli_with_sources();
    let loaded_config = load_default_file_config()?;
    let args =
        config_runtime::apply_config_defaults(args, &cli_sources, loaded_config.config.as_ref());

    let default_level = config_runtime::resolve_default_log_level(&args);
    let force_cli_log_level = config_runtime::should_force_cli_log_level(&cli_sources);
    let caps = terminal::TerminalCaps::detect();
    terminal::init_tracing(
        default_level,
        force_cli_log_level,
        caps.color_enabled(args.no_color),
    );

    debug!(?args, "CLI arguments parsed");
    if loaded_config.config.is_some()
        && let Some(path) = &loaded_config.path
    {
        info!(path = %path.display(), "Loaded config file");
    }

    let config = config_runtime::build_downloader_config(&args)?;
    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create download directory '{}'",
            config.output_dir.display()
        )
    })?;
    debug!(dir = %config.output_dir.display(), "Download directory ready");

    let engine =
        DownloadEngine::from_config(&config).context("Failed to initialise the HTTP client")?;
    let ctx = SessionContext {
        engine,
        output_dir: config.output_dir,
        show_progress_bar: caps.progress_bar_enabled(args.quiet),
    };

    let mut stats = SessionStats::new();
    output::print_header(&ctx.output_dir);

    if args.urls.is_empty() {
        repl::run_interactive(&ctx, &mut stats).await
    } else {
        Ok(download_orchestrator::run_batch(&ctx, &args.urls, &mut stats).await)
    }
}
