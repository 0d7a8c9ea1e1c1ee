//! Filename extraction, sanitization, and collision-safe path resolution.
//!
//! Names come from, in order: the `Content-Disposition` header, the last URL
//! path segment, or a timestamped fallback whose extension is guessed from
//! the content type.

use std::path::{Component, Path, PathBuf};

use url::Url;

use crate::platform::Platform;

/// Name used when a candidate cannot be a single path segment.
const FALLBACK_FILENAME: &str = "download.bin";

/// Extension used when the content type is unknown.
const FALLBACK_EXTENSION: &str = ".bin";

/// Media type fragments and the extension they map to. First contained fragment wins.
const CONTENT_TYPE_EXTENSIONS: &[(&str, &str)] = &[
    ("image/jpeg", ".jpg"),
    ("image/jpg", ".jpg"),
    ("image/png", ".png"),
    ("image/gif", ".gif"),
    ("image/webp", ".webp"),
    ("image/bmp", ".bmp"),
    ("video/mp4", ".mp4"),
    ("video/avi", ".avi"),
    ("video/x-matroska", ".mkv"),
    ("video/quicktime", ".mov"),
    ("audio/mpeg", ".mp3"),
    ("audio/wav", ".wav"),
    ("application/pdf", ".pdf"),
    ("text/plain", ".txt"),
    ("application/zip", ".zip"),
    ("application/x-rar-compressed", ".rar"),
];

/// Characters Windows (and Android shared storage) refuse in file names.
const RESTRICTED_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Seconds since the Unix epoch, or 0 if the clock is before it.
pub(crate) fn unix_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// `download_<timestamp><extension>`.
pub(crate) fn timestamped_filename(extension: &str) -> String {
    format!("download_{}{extension}", unix_timestamp())
}

/// Guess file extension from a Content-Type header value.
pub(crate) fn extension_from_content_type(content_type: &str) -> &'static str {
    let content_type = content_type.to_ascii_lowercase();
    CONTENT_TYPE_EXTENSIONS
        .iter()
        .find(|(fragment, _)| content_type.contains(*fragment))
        .map_or(FALLBACK_EXTENSION, |&(_, ext)| ext)
}

/// Parses a Content-Disposition header value and returns the raw filename.
///
/// The first `filename=` directive wins; quoted values end at the closing quote,
/// unquoted ones at `;`. `filename*=charset''value` (RFC 5987) is only consulted
/// when no plain directive is present.
pub(crate) fn parse_content_disposition(header: &str) -> Option<String> {
    if let Some(pos) = header.find("filename=") {
        let value = header[pos + "filename=".len()..].trim_start();
        let raw = match value.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let inner = &value[1..];
                inner.find(quote).map_or(inner, |end| &inner[..end])
            }
            _ => value.split(';').next().unwrap_or_default(),
        };
        let filename = raw.trim().trim_matches(|c| c == '"' || c == '\'');
        if !filename.is_empty() {
            return Some(filename.to_string());
        }
    }

    let pos = header.find("filename*=")?;
    let value = header[pos + "filename*=".len()..].trim();
    let (_, encoded) = value.split_once("''")?;
    let encoded = encoded.split(';').next().unwrap_or_default().trim();
    let decoded = urlencoding::decode(encoded).ok()?;
    (!decoded.is_empty()).then(|| decoded.into_owned())
}

/// Last path segment of the URL, percent-decoded, if it is non-empty.
pub(crate) fn filename_from_url(url: &Url) -> Option<String> {
    let last = url.path_segments()?.next_back()?;
    if last.is_empty() {
        return None;
    }
    let decoded = urlencoding::decode(last).map_or_else(|_| last.to_string(), |d| d.into_owned());
    Some(decoded)
}

/// Derives the filename for a response, sanitized for the current platform.
///
/// Never returns an empty string.
pub fn extract_filename(
    url: &Url,
    content_disposition: Option<&str>,
    content_type: &str,
) -> String {
    if let Some(name) = content_disposition
        .and_then(parse_content_disposition)
        .map(|name| sanitize_filename(&name))
        .filter(|name| !name.is_empty())
    {
        return name;
    }

    let name = filename_from_url(url)
        .filter(|name| name != "/")
        .unwrap_or_else(|| timestamped_filename(extension_from_content_type(content_type)));

    let sanitized = sanitize_filename(&name);
    if sanitized.is_empty() {
        timestamped_filename(FALLBACK_EXTENSION)
    } else {
        sanitized
    }
}

/// Sanitizes a filename for the platform this binary runs on.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    sanitize_filename_for(name, Platform::current())
}

/// Replaces characters the platform's filesystem cannot store with `_`.
///
/// Windows and Android replace `< > : " / \ | ? *`; everything else only `/`.
/// Control characters are replaced everywhere, and `.`/`..` lose their dots
/// so the name can never address a parent directory.
#[must_use]
pub fn sanitize_filename_for(name: &str, platform: Platform) -> String {
    let restricted = platform.uses_restricted_filenames();
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' => '_',
            c if restricted && RESTRICTED_CHARS.contains(&c) => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if is_safe_filename_segment(&sanitized) {
        sanitized
    } else {
        sanitized.replace('.', "_")
    }
}

fn is_safe_filename_segment(name: &str) -> bool {
    !Path::new(name).components().any(|component| {
        matches!(
            component,
            Component::CurDir | Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    })
}

/// Whether anything (file, directory, or dangling link) occupies `path`.
fn path_is_taken(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok()
}

/// Resolves a path in `dir` that no existing entry occupies.
///
/// Returns `dir/filename` when free, otherwise the first free
/// `<stem>_<n><ext>` for n = 1, 2, ... There is no upper bound on `n`.
#[must_use]
pub fn resolve_unique_path(dir: &Path, filename: &str) -> PathBuf {
    let mut components = Path::new(filename).components();
    let single_segment = matches!(components.next(), Some(Component::Normal(_)))
        && components.next().is_none();
    let filename = if single_segment {
        filename
    } else {
        FALLBACK_FILENAME
    };

    let base_path = dir.join(filename);
    if !path_is_taken(&base_path) {
        return base_path;
    }

    let stem = base_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = base_path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter: u64 = 1;
    loop {
        let candidate = dir.join(format!("{stem}_{counter}{ext}"));
        if !path_is_taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}
