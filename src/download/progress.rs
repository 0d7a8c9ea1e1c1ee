//! Transfer progress values and the sink they are delivered to.
//!
//! The transfer engine owns a [`ProgressTracker`] for the duration of one
//! transfer and hands every [`TransferProgress`] it produces to a
//! caller-supplied [`ProgressSink`]. Display concerns stay with the caller.

use std::path::Path;
use std::time::{Duration, Instant};

use super::constants::{BYTES_PER_MB, PROGRESS_BAR_WIDTH};
use super::metadata::ProbeOutcome;

const FILLED_CELL: char = '█';
const EMPTY_CELL: char = '░';

/// Progress of a transfer whose total size is known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferProgress {
    pub bytes_transferred: u64,
    pub total_bytes: u64,
    pub elapsed: Duration,
}

impl TransferProgress {
    /// Percentage of `total_bytes` received so far.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent_complete(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        self.bytes_transferred as f64 / self.total_bytes as f64 * 100.0
    }

    /// Average throughput since the transfer started, in MB/s (0 before any time elapsed).
    #[must_use]
    pub fn throughput_mbps(&self) -> f64 {
        throughput_mbps(self.bytes_transferred, self.elapsed)
    }

    /// Number of filled cells in a bar `width` cells wide, rounded down.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn filled_units(&self, width: usize) -> usize {
        let filled = (width as f64 * self.percent_complete() / 100.0).floor();
        (filled.max(0.0) as usize).min(width)
    }

    /// Fixed-width bar: filled cells followed by empty ones.
    #[must_use]
    pub fn render_bar(&self, width: usize) -> String {
        let filled = self.filled_units(width);
        let mut bar = String::with_capacity(width * FILLED_CELL.len_utf8());
        bar.extend(std::iter::repeat_n(FILLED_CELL, filled));
        bar.extend(std::iter::repeat_n(EMPTY_CELL, width - filled));
        bar
    }

    /// `[bar] percent% | speed MB/s` with the default bar width.
    #[must_use]
    pub fn render_line(&self) -> String {
        format!(
            "[{}] {:6.1}% | {:5.1} MB/s",
            self.render_bar(PROGRESS_BAR_WIDTH),
            self.percent_complete(),
            self.throughput_mbps()
        )
    }
}

/// Bytes per elapsed second expressed in MB/s; 0 when no time has elapsed.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn throughput_mbps(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    bytes as f64 / secs / BYTES_PER_MB
}

/// Counters for a finished transfer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferReport {
    pub bytes_transferred: u64,
    /// `Content-Length` of the GET response, if positive.
    pub total_bytes: Option<u64>,
    pub elapsed: Duration,
}

impl TransferReport {
    #[must_use]
    pub fn throughput_mbps(&self) -> f64 {
        throughput_mbps(self.bytes_transferred, self.elapsed)
    }
}

/// Receives the events of one download attempt.
///
/// Only [`report`](Self::report) is required; closures taking a
/// `&TransferProgress` implement the trait directly.
pub trait ProgressSink {
    /// Called once the probe finished and the destination path is fixed,
    /// before any body byte is requested.
    fn resolved(&mut self, _probe: &ProbeOutcome, _target: &Path) {}

    /// Called after each written chunk when the total size is known.
    fn report(&mut self, progress: &TransferProgress);

    /// Called once after the body has been fully written.
    fn finish(&mut self, _report: &TransferReport) {}
}

impl<F> ProgressSink for F
where
    F: FnMut(&TransferProgress),
{
    fn report(&mut self, progress: &TransferProgress) {
        self(progress);
    }
}

/// Sink that discards all updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn report(&mut self, _progress: &TransferProgress) {}
}

/// Per-transfer counters.
#[derive(Debug)]
pub struct ProgressTracker {
    total_bytes: Option<u64>,
    bytes_transferred: u64,
    started: Instant,
}

impl ProgressTracker {
    /// Starts tracking now. A total of `Some(0)` is treated as unknown.
    #[must_use]
    pub fn start(total_bytes: Option<u64>) -> Self {
        Self {
            total_bytes: total_bytes.filter(|&total| total > 0),
            bytes_transferred: 0,
            started: Instant::now(),
        }
    }

    /// Records `len` written bytes and returns a progress value when the total is known.
    pub fn record(&mut self, len: usize) -> Option<TransferProgress> {
        let elapsed = self.started.elapsed();
        self.record_at(len, elapsed)
    }

    fn record_at(&mut self, len: usize, elapsed: Duration) -> Option<TransferProgress> {
        self.bytes_transferred = self.bytes_transferred.saturating_add(len as u64);
        let total_bytes = self.total_bytes?;
        Some(TransferProgress {
            bytes_transferred: self.bytes_transferred,
            total_bytes,
            elapsed,
        })
    }

    /// Final counters.
    #[must_use]
    pub fn finish(&self) -> TransferReport {
        TransferReport {
            bytes_transferred: self.bytes_transferred,
            total_bytes: self.total_bytes,
            elapsed: self.started.elapsed(),
        }
    }
}
