//! HTTP client wrapper: metadata probing and streamed transfers.
//!
//! The probe is a header-only request that never fails outright; the
//! transfer is a streamed GET written to disk in fixed-size slices.

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap,
    HeaderValue,
};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::constants::{CHUNK_SIZE, PROBE_TIMEOUT_SECS, TRANSFER_TIMEOUT_SECS};
use super::error::DownloadError;
use super::filename::extract_filename;
use super::metadata::{ProbeOutcome, ResourceMetadata, classify};
use super::progress::{ProgressSink, ProgressTracker, TransferReport};
use crate::user_agent;

/// HTTP client for probing and downloading single files.
///
/// Create once and reuse across downloads to keep pooled connections.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    probe_timeout: Duration,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a client with the default probe (10s) and transfer (30s) timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static configuration.
    /// This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::new_with_timeouts(PROBE_TIMEOUT_SECS, TRANSFER_TIMEOUT_SECS)
    }

    /// Creates a client with explicit timeouts, in seconds.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the supplied configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_timeouts(probe_timeout_secs: u64, transfer_timeout_secs: u64) -> Self {
        Self::try_new_with_timeouts(probe_timeout_secs, transfer_timeout_secs)
            .expect("failed to build HTTP client with static configuration")
    }

    /// Fallible variant of [`new_with_timeouts`](Self::new_with_timeouts).
    ///
    /// # Errors
    ///
    /// Returns the builder error when the TLS backend or system configuration
    /// cannot be initialised.
    pub fn try_new_with_timeouts(
        probe_timeout_secs: u64,
        transfer_timeout_secs: u64,
    ) -> Result<Self, reqwest::Error> {
        let transfer_timeout = Duration::from_secs(transfer_timeout_secs);
        let client = Client::builder()
            .connect_timeout(transfer_timeout)
            .read_timeout(transfer_timeout)
            .user_agent(user_agent::default_user_agent())
            .default_headers(default_headers())
            .build()?;
        Ok(Self {
            client,
            probe_timeout: Duration::from_secs(probe_timeout_secs),
        })
    }

    /// Learns filename, size, and type of a resource without fetching its body.
    ///
    /// Any failure (bad URL, network error, timeout, non-2xx status) yields
    /// [`ProbeOutcome::Degraded`] with fallback metadata instead of an error.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn probe(&self, url: &str) -> ProbeOutcome {
        match self.try_probe(url).await {
            Ok(metadata) => {
                debug!(
                    filename = %metadata.filename,
                    size = metadata.size_bytes,
                    category = %metadata.category,
                    "probe resolved"
                );
                ProbeOutcome::Resolved(metadata)
            }
            Err(error) => {
                warn!(error = %error, "probe failed, continuing with fallback metadata");
                ProbeOutcome::degraded(url, &error)
            }
        }
    }

    async fn try_probe(&self, url: &str) -> Result<ResourceMetadata, DownloadError> {
        let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self
            .client
            .head(parsed.clone())
            .timeout(self.probe_timeout)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let headers = response.headers();
        let content_type = header_str(headers, CONTENT_TYPE).unwrap_or_default();
        let size_bytes = content_length(headers).unwrap_or(0);
        let filename = extract_filename(
            &parsed,
            header_str(headers, CONTENT_DISPOSITION).as_deref(),
            &content_type,
        );
        let category = classify(&content_type, &filename);

        Ok(ResourceMetadata {
            filename,
            size_bytes,
            category,
            content_type,
            source_url: url.to_string(),
        })
    }

    /// Streams `url` into `path`, reporting progress to `sink`.
    ///
    /// The file is created (or truncated) only after a successful status line.
    /// It is not removed on failure; that decision belongs to the caller.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if the URL is invalid, the request fails or
    /// times out, the server answers with a non-2xx status, or writing fails.
    #[instrument(skip(self, sink), fields(url = %url, path = %path.display()))]
    pub async fn fetch_to_file(
        &self,
        url: &str,
        path: &Path,
        sink: &mut dyn ProgressSink,
    ) -> Result<TransferReport, DownloadError> {
        let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let total_bytes = content_length(response.headers());
        debug!(?total_bytes, "transfer started");

        let file = File::create(path)
            .await
            .map_err(|e| DownloadError::io(path, e))?;

        let report = stream_to_file(file, response, url, path, total_bytes, sink).await?;

        info!(
            bytes = report.bytes_transferred,
            elapsed_ms = report.elapsed.as_millis(),
            "transfer complete"
        );
        Ok(report)
    }
}

/// Writes the body in slices of at most [`CHUNK_SIZE`] bytes.
async fn stream_to_file(
    file: File,
    response: reqwest::Response,
    url: &str,
    path: &Path,
    total_bytes: Option<u64>,
    sink: &mut dyn ProgressSink,
) -> Result<TransferReport, DownloadError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut tracker = ProgressTracker::start(total_bytes);

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::network(url, e))?;

        for slice in chunk.chunks(CHUNK_SIZE) {
            if slice.is_empty() {
                continue;
            }
            writer
                .write_all(slice)
                .await
                .map_err(|e| DownloadError::io(path, e))?;
            if let Some(progress) = tracker.record(slice.len()) {
                sink.report(&progress);
            }
        }
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(path, e))?;

    let report = tracker.finish();
    sink.finish(&report);
    Ok(report)
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers
}

/// Header value as text. Servers often send raw UTF-8 filenames, so bytes
/// outside visible ASCII are decoded lossily instead of dropping the header.
fn header_str(headers: &HeaderMap, name: reqwest::header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
}

/// Declared body length; absent, non-numeric, and negative values yield `None`.
fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}
