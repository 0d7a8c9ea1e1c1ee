//! Constants for the download module (timeouts, chunking, progress display).

/// Default timeout for the header-only metadata probe (10 seconds).
pub const PROBE_TIMEOUT_SECS: u64 = 10;

/// Default timeout for the streamed GET (30 seconds, applied to connect and each read).
pub const TRANSFER_TIMEOUT_SECS: u64 = 30;

/// Size of the slices the response body is written and reported in.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Width of the textual progress bar, in cells.
pub const PROGRESS_BAR_WIDTH: usize = 40;

/// Bytes per displayed megabyte.
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
