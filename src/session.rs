//! Cumulative statistics for one interactive session.
//!
//! Created at startup, updated by the orchestrator after every successful
//! download, and read through [`SessionStats::snapshot`]. Nothing is persisted.

use std::time::{Duration, Instant};

/// Session-wide download counters.
///
/// Owned by the command loop and lent `&mut` to the orchestrator, so there is
/// exactly one writer at a time.
#[derive(Debug, Clone)]
pub struct SessionStats {
    download_count: u64,
    total_bytes: u64,
    started_at: Instant,
}

/// Point-in-time copy of [`SessionStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub download_count: u64,
    pub total_bytes: u64,
    pub session_duration: Duration,
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStats {
    /// Starts a session now with zero downloads.
    #[must_use]
    pub fn new() -> Self {
        Self {
            download_count: 0,
            total_bytes: 0,
            started_at: Instant::now(),
        }
    }

    /// Records one completed download of `bytes` bytes.
    pub fn record_download(&mut self, bytes: u64) {
        self.download_count += 1;
        self.total_bytes = self.total_bytes.saturating_add(bytes);
    }

    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            download_count: self.download_count,
            total_bytes: self.total_bytes,
            session_duration: self.started_at.elapsed(),
        }
    }
}

/// Formats a duration as `H:MM:SS` (whole seconds).
#[must_use]
pub fn format_session_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours}:{minutes:02}:{seconds:02}")
}
