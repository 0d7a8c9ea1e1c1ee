//! Download orchestration: probe, name, transfer, and account.
//!
//! Each call to [`DownloadEngine::resolve_and_download`] walks a fresh state
//! machine `Idle → Resolving → Transferring → {Succeeded, Failed}`. The probe
//! can only degrade, never fail, so `Resolving` always advances. Session
//! statistics change only on `Succeeded`.
//!
//! # Example
//!
//! ```no_run
//! use ir_downloader_core::download::{DownloadEngine, HttpClient, NoopProgress, PartialFilePolicy};
//! use ir_downloader_core::SessionStats;
//!
//! # async fn example() {
//! let engine = DownloadEngine::new(HttpClient::new(), "./downloads", PartialFilePolicy::Remove);
//! let mut stats = SessionStats::new();
//! let outcome = engine
//!     .resolve_and_download("https://example.com/file.zip", &mut stats, &mut NoopProgress)
//!     .await;
//! println!("success: {}", outcome.is_success());
//! # }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use super::client::HttpClient;
use super::constants::{PROBE_TIMEOUT_SECS, TRANSFER_TIMEOUT_SECS};
use super::error::DownloadError;
use super::filename::resolve_unique_path;
use super::metadata::{ProbeOutcome, ResourceMetadata};
use super::progress::{ProgressSink, throughput_mbps};
use crate::platform::{DOWNLOAD_FOLDER_NAME, Platform};
use crate::session::SessionStats;

/// What to do with a partially written file after a failed transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartialFilePolicy {
    /// Delete the partial file.
    #[default]
    Remove,
    /// Leave the partial file in place.
    Keep,
}

/// Settings the engine is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloaderConfig {
    /// Destination directory; must exist before downloading.
    pub output_dir: PathBuf,
    pub probe_timeout_secs: u64,
    pub transfer_timeout_secs: u64,
    pub partial_policy: PartialFilePolicy,
}

impl Default for DownloaderConfig {
    /// Platform download folder, or `IR_Downloads` under the working directory
    /// when no home directory is known.
    fn default() -> Self {
        let output_dir = Platform::current()
            .default_download_dir()
            .unwrap_or_else(|| PathBuf::from(DOWNLOAD_FOLDER_NAME));
        Self::new(output_dir)
    }
}

impl DownloaderConfig {
    /// Default timeouts and policy for `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            probe_timeout_secs: PROBE_TIMEOUT_SECS,
            transfer_timeout_secs: TRANSFER_TIMEOUT_SECS,
            partial_policy: PartialFilePolicy::default(),
        }
    }
}

/// Phase of a single download attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadPhase {
    Idle,
    Resolving,
    Transferring,
    Succeeded,
    Failed,
}

impl DownloadPhase {
    /// Whether `next` is a legal successor of `self`.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Resolving)
                | (Self::Resolving, Self::Transferring)
                | (Self::Transferring, Self::Succeeded | Self::Failed)
        )
    }
}

impl fmt::Display for DownloadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Resolving => "resolving",
            Self::Transferring => "transferring",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Tracks the phase of one attempt.
#[derive(Debug)]
struct PhaseMachine {
    phase: DownloadPhase,
}

impl PhaseMachine {
    fn new() -> Self {
        Self {
            phase: DownloadPhase::Idle,
        }
    }

    fn advance(&mut self, next: DownloadPhase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "illegal download phase transition {} -> {next}",
            self.phase
        );
        debug!(from = %self.phase, to = %next, "download phase");
        self.phase = next;
    }
}

/// A download that reached `Succeeded`.
#[derive(Debug)]
pub struct CompletedDownload {
    /// Where the file was written.
    pub path: PathBuf,
    pub probe: ProbeOutcome,
    /// Size of the written file on disk.
    pub size_bytes: u64,
    /// Wall time of the transfer.
    pub elapsed: Duration,
}

impl CompletedDownload {
    #[must_use]
    pub fn metadata(&self) -> &ResourceMetadata {
        self.probe.metadata()
    }

    /// Average speed over the whole transfer, in MB/s.
    #[must_use]
    pub fn throughput_mbps(&self) -> f64 {
        throughput_mbps(self.size_bytes, self.elapsed)
    }
}

/// A download that reached `Failed`.
#[derive(Debug)]
pub struct FailedDownload {
    /// Path the transfer was writing to.
    pub target: PathBuf,
    pub probe: ProbeOutcome,
    pub error: DownloadError,
    /// Whether a partial file was deleted.
    pub partial_removed: bool,
}

impl FailedDownload {
    #[must_use]
    pub fn metadata(&self) -> &ResourceMetadata {
        self.probe.metadata()
    }
}

/// Terminal state of a download attempt.
#[derive(Debug)]
pub enum DownloadOutcome {
    Succeeded(CompletedDownload),
    Failed(FailedDownload),
}

impl DownloadOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    #[must_use]
    pub fn phase(&self) -> DownloadPhase {
        match self {
            Self::Succeeded(_) => DownloadPhase::Succeeded,
            Self::Failed(_) => DownloadPhase::Failed,
        }
    }

    /// Path of the completed file, or of the attempted target on failure.
    #[must_use]
    pub fn final_path(&self) -> &Path {
        match self {
            Self::Succeeded(done) => &done.path,
            Self::Failed(failed) => &failed.target,
        }
    }

    #[must_use]
    pub fn probe(&self) -> &ProbeOutcome {
        match self {
            Self::Succeeded(done) => &done.probe,
            Self::Failed(failed) => &failed.probe,
        }
    }
}

/// Sequences probe, filename resolution, transfer, and statistics.
///
/// Holds no per-download state; every call starts from `Idle`.
#[derive(Debug, Clone)]
pub struct DownloadEngine {
    client: HttpClient,
    output_dir: PathBuf,
    partial_policy: PartialFilePolicy,
}

impl DownloadEngine {
    /// Creates an engine writing into `output_dir`.
    #[must_use]
    pub fn new(
        client: HttpClient,
        output_dir: impl Into<PathBuf>,
        partial_policy: PartialFilePolicy,
    ) -> Self {
        Self {
            client,
            output_dir: output_dir.into(),
            partial_policy,
        }
    }

    /// Builds the HTTP client and engine from `config`.
    ///
    /// # Errors
    ///
    /// Returns the client builder error when the HTTP client cannot be initialised.
    pub fn from_config(config: &DownloaderConfig) -> Result<Self, reqwest::Error> {
        let client = HttpClient::try_new_with_timeouts(
            config.probe_timeout_secs,
            config.transfer_timeout_secs,
        )?;
        Ok(Self::new(
            client,
            config.output_dir.clone(),
            config.partial_policy,
        ))
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    #[must_use]
    pub fn partial_policy(&self) -> PartialFilePolicy {
        self.partial_policy
    }

    /// Downloads `url` into the output directory under a collision-free name.
    ///
    /// Never returns an error: transfer failures come back as
    /// [`DownloadOutcome::Failed`] and leave `stats` untouched.
    #[instrument(skip(self, stats, sink), fields(url = %url))]
    pub async fn resolve_and_download(
        &self,
        url: &str,
        stats: &mut SessionStats,
        sink: &mut dyn ProgressSink,
    ) -> DownloadOutcome {
        let mut machine = PhaseMachine::new();

        machine.advance(DownloadPhase::Resolving);
        let probe = self.client.probe(url).await;
        let target = resolve_unique_path(&self.output_dir, &probe.metadata().filename);
        debug!(
            path = %target.display(),
            degraded = probe.is_degraded(),
            "resolved output path"
        );
        sink.resolved(&probe, &target);

        machine.advance(DownloadPhase::Transferring);
        let started = Instant::now();
        match self.client.fetch_to_file(url, &target, sink).await {
            Ok(report) => {
                machine.advance(DownloadPhase::Succeeded);
                let elapsed = started.elapsed();
                let size_bytes = match tokio::fs::metadata(&target).await {
                    Ok(meta) => meta.len(),
                    Err(error) => {
                        warn!(
                            path = %target.display(),
                            error = %error,
                            "could not stat downloaded file"
                        );
                        report.bytes_transferred
                    }
                };
                stats.record_download(size_bytes);
                info!(path = %target.display(), bytes = size_bytes, "download complete");
                DownloadOutcome::Succeeded(CompletedDownload {
                    path: target,
                    probe,
                    size_bytes,
                    elapsed,
                })
            }
            Err(error) => {
                machine.advance(DownloadPhase::Failed);
                warn!(error = %error, "download failed");
                let partial_removed = self.discard_partial(&target).await;
                DownloadOutcome::Failed(FailedDownload {
                    target,
                    probe,
                    error,
                    partial_removed,
                })
            }
        }
    }

    /// Applies the partial-file policy to `target`, returning whether a file was deleted.
    ///
    /// Also used by callers that abandon a transfer midway.
    pub async fn discard_partial(&self, target: &Path) -> bool {
        if self.partial_policy == PartialFilePolicy::Keep
            || tokio::fs::symlink_metadata(target).await.is_err()
        {
            return false;
        }
        match tokio::fs::remove_file(target).await {
            Ok(()) => {
                debug!(path = %target.display(), "removed partial file");
                true
            }
            Err(error) => {
                warn!(path = %target.display(), error = %error, "could not remove partial file");
                false
            }
        }
    }
}
