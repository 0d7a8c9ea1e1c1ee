//! Resource metadata learned from the probe, and file type classification.

use std::fmt;
use std::path::Path;

use super::error::DownloadError;
use super::filename::timestamped_filename;

/// Coarse classification of a remote resource, used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    Image,
    Video,
    Audio,
    Text,
    Pdf,
    Document,
    Archive,
    /// Nothing matched the content type or the extension.
    File,
    /// The probe failed, so nothing is known.
    Unknown,
}

impl FileCategory {
    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::Video => "Video",
            Self::Audio => "Audio",
            Self::Text => "Text",
            Self::Pdf => "PDF",
            Self::Document => "Document",
            Self::Archive => "Archive",
            Self::File => "File",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Content-type prefixes, checked in order.
const CONTENT_TYPE_PREFIXES: &[(&str, FileCategory)] = &[
    ("image/", FileCategory::Image),
    ("video/", FileCategory::Video),
    ("audio/", FileCategory::Audio),
    ("text/", FileCategory::Text),
];

/// Exact media types, checked after the prefixes.
const CONTENT_TYPE_EXACT: &[(&str, FileCategory)] = &[
    ("application/pdf", FileCategory::Pdf),
    ("application/zip", FileCategory::Archive),
];

fn category_from_extension(ext: &str) -> Option<FileCategory> {
    let category = match ext {
        "jpg" | "jpeg" | "png" | "gif" | "webp" | "bmp" => FileCategory::Image,
        "mp4" | "avi" | "mkv" | "mov" | "webm" => FileCategory::Video,
        "mp3" | "wav" | "flac" => FileCategory::Audio,
        "pdf" => FileCategory::Pdf,
        "doc" | "docx" => FileCategory::Document,
        "txt" => FileCategory::Text,
        "zip" | "rar" | "7z" | "tar" => FileCategory::Archive,
        _ => return None,
    };
    Some(category)
}

/// Classifies a resource by content type first, then by filename extension.
///
/// Media-type parameters (`; charset=...`) and case are ignored.
#[must_use]
pub fn classify(content_type: &str, filename: &str) -> FileCategory {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    let by_content_type = CONTENT_TYPE_PREFIXES
        .iter()
        .find(|(prefix, _)| media_type.starts_with(*prefix))
        .or_else(|| {
            CONTENT_TYPE_EXACT
                .iter()
                .find(|(exact, _)| media_type == *exact)
        })
        .map(|&(_, category)| category);
    if let Some(category) = by_content_type {
        return category;
    }

    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .and_then(|ext| category_from_extension(&ext))
        .unwrap_or(FileCategory::File)
}

/// What the probe learned about a remote resource.
///
/// Built once per download attempt and not modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceMetadata {
    /// Suggested filename (already sanitized for the current platform).
    pub filename: String,
    /// Declared size in bytes, 0 when unknown.
    pub size_bytes: u64,
    /// Classification for display.
    pub category: FileCategory,
    /// Raw `Content-Type` value, empty when absent.
    pub content_type: String,
    /// URL the metadata describes.
    pub source_url: String,
}

impl ResourceMetadata {
    /// Metadata used when the probe fails: `download_<timestamp>.bin`, size 0, category Unknown.
    #[must_use]
    pub fn fallback(source_url: &str) -> Self {
        Self {
            filename: timestamped_filename(".bin"),
            size_bytes: 0,
            category: FileCategory::Unknown,
            content_type: String::new(),
            source_url: source_url.to_string(),
        }
    }

    /// Declared size, if the server sent one.
    #[must_use]
    pub fn known_size(&self) -> Option<u64> {
        (self.size_bytes > 0).then_some(self.size_bytes)
    }
}

/// Why a probe produced fallback metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradedReason {
    InvalidUrl,
    Timeout,
    Network,
    HttpStatus(u16),
}

impl DegradedReason {
    /// Maps the probe error onto a reason code.
    ///
    /// A probe writes nothing locally, so `Io` is folded into `Network`.
    #[must_use]
    pub fn from_error(error: &DownloadError) -> Self {
        match error {
            DownloadError::InvalidUrl { .. } => Self::InvalidUrl,
            DownloadError::Timeout { .. } => Self::Timeout,
            DownloadError::HttpStatus { status, .. } => Self::HttpStatus(*status),
            DownloadError::Network { .. } | DownloadError::Io { .. } => Self::Network,
        }
    }
}

impl fmt::Display for DegradedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl => f.write_str("invalid URL"),
            Self::Timeout => f.write_str("probe timed out"),
            Self::Network => f.write_str("network error"),
            Self::HttpStatus(status) => write!(f, "server answered HTTP {status}"),
        }
    }
}

/// Result of probing a URL. A probe never fails outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The probe succeeded.
    Resolved(ResourceMetadata),
    /// The probe failed; the metadata is the fallback record.
    Degraded {
        metadata: ResourceMetadata,
        reason: DegradedReason,
        /// Human-readable description of the underlying error.
        message: String,
    },
}

impl ProbeOutcome {
    /// Builds the degraded outcome for a failed probe.
    #[must_use]
    pub fn degraded(source_url: &str, error: &DownloadError) -> Self {
        Self::Degraded {
            metadata: ResourceMetadata::fallback(source_url),
            reason: DegradedReason::from_error(error),
            message: error.to_string(),
        }
    }

    /// Metadata to continue the download with.
    #[must_use]
    pub fn metadata(&self) -> &ResourceMetadata {
        match self {
            Self::Resolved(metadata) | Self::Degraded { metadata, .. } => metadata,
        }
    }

    /// Consumes the outcome, returning the metadata.
    #[must_use]
    pub fn into_metadata(self) -> ResourceMetadata {
        match self {
            Self::Resolved(metadata) | Self::Degraded { metadata, .. } => metadata,
        }
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}
