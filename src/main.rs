//! CLI entry point for the IR downloader.

mod app;
mod app_config;
mod cli;
mod output;

/// How the process ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    Success,
    /// Some one-shot downloads failed.
    Partial,
    Failure,
    /// Ctrl-C.
    Interrupted,
}

impl ProcessExit {
    pub(crate) const fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::Partial => 2,
            Self::Interrupted => 130,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let exit = match app::runtime::run_downloader().await {
        Ok(exit) => exit,
        Err(error) => {
            eprintln!("Error: {error:#}");
            ProcessExit::Failure
        }
    };
    // Exit here rather than returning: a blocked stdin read would otherwise
    // keep the runtime from shutting down after Ctrl-C.
    std::process::exit(exit.code());
}
