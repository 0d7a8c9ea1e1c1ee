//! Single-file HTTP downloads.
//!
//! A download runs in two HTTP steps: a `HEAD` probe that learns the
//! filename, size, and type of the resource, then a streaming `GET` that
//! writes the body to disk in fixed-size chunks while reporting progress.
//! [`DownloadEngine`] sequences both and keeps the session statistics.
//!
//! # Example
//!
//! ```no_run
//! use ir_downloader_core::download::{HttpClient, NoopProgress};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let probe = client.probe("https://example.com/paper.pdf").await;
//! let target = Path::new("./downloads").join(&probe.metadata().filename);
//! let report = client
//!     .fetch_to_file("https://example.com/paper.pdf", &target, &mut NoopProgress)
//!     .await?;
//! println!("{} bytes", report.bytes_transferred);
//! # Ok(())
//! # }
//! ```

mod client;
pub mod constants;
mod engine;
mod error;
pub mod filename;
mod metadata;
mod progress;

pub use client::HttpClient;
pub use engine::{
    CompletedDownload, DownloadEngine, DownloadOutcome, DownloadPhase, DownloaderConfig,
    FailedDownload, PartialFilePolicy,
};
pub use error::DownloadError;
pub use filename::{extract_filename, resolve_unique_path, sanitize_filename};
pub use metadata::{DegradedReason, FileCategory, ProbeOutcome, ResourceMetadata, classify};
pub use progress::{
    NoopProgress, ProgressSink, ProgressTracker, TransferProgress, TransferReport, throughput_mbps,
};

// No module-local Result alias; signatures spell out `Result<T, DownloadError>`.
