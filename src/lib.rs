//! IR Downloader core library
//!
//! Probes and downloads single files over HTTP(S) into a per-platform
//! download directory, keeping per-session statistics.
//!
//! # Architecture
//!
//! - [`download`] - probe, filename resolution, streaming transfer, orchestration
//! - [`platform`] - host platform detection and the default download directory
//! - [`session`] - session statistics

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub mod platform;
pub mod session;
#[cfg(test)]
pub mod test_support;
mod user_agent;

// Re-export commonly used types
pub use download::{
    DownloadEngine, DownloadError, DownloadOutcome, DownloaderConfig, FileCategory, HttpClient,
    PartialFilePolicy, ProbeOutcome, ProgressSink, ResourceMetadata, TransferProgress,
};
pub use platform::Platform;
pub use session::{SessionStats, StatsSnapshot, format_session_duration};
