//! CLI output formatting and display helpers.
//!
//! Every `*_lines` function builds the text; the `print_*` wrappers write it
//! to stdout.

use std::path::Path;

use ir_downloader_core::download::constants::BYTES_PER_MB;
use ir_downloader_core::download::{CompletedDownload, FailedDownload};
use ir_downloader_core::{Platform, ProbeOutcome, StatsSnapshot, format_session_duration};

/// Prompt shown before each line of input.
pub const PROMPT: &str = "Enter URL ('stats' for statistics, 'exit' to quit): ";

/// Shown for input that is neither a command nor an http(s) URL.
pub const INVALID_INPUT_MESSAGE: &str = "URL must start with http:// or https://";

/// Example shown after [`INVALID_INPUT_MESSAGE`].
pub const INVALID_INPUT_EXAMPLE: &str = "Example: https://example.com/file.zip";

/// Shown on Ctrl-C before the statistics report.
pub const INTERRUPTED_MESSAGE: &str = "Download interrupted by user";

/// Shown when the interactive session ends normally.
pub const GOODBYE_MESSAGE: &str = "Thank you for using IR Downloader!";

const THIN_RULE_WIDTH: usize = 70;

fn thin_rule() -> String {
    "─".repeat(THIN_RULE_WIDTH)
}

fn thick_rule() -> String {
    "═".repeat(THIN_RULE_WIDTH)
}

#[allow(clippy::cast_precision_loss)]
fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

/// Startup header: tool, version, platform, architecture, destination.
pub fn header_lines(platform: Platform, arch: &str, output_dir: &Path) -> Vec<String> {
    vec![
        format!("IR Downloader v{}", env!("CARGO_PKG_VERSION")),
        format!("Platform: {platform} ({arch})"),
        format!("Download directory: {}", output_dir.display()),
        thick_rule(),
    ]
}

pub fn print_header(output_dir: &Path) {
    print_lines(&header_lines(
        Platform::current(),
        std::env::consts::ARCH,
        output_dir,
    ));
}

/// What the probe learned, plus a notice when it fell back.
pub fn probe_lines(probe: &ProbeOutcome, target: &Path) -> Vec<String> {
    let metadata = probe.metadata();
    let mut lines = Vec::with_capacity(7);
    if let ProbeOutcome::Degraded {
        reason, message, ..
    } = probe
    {
        lines.push(format!(
            "Could not inspect URL ({reason}): {message}. Downloading anyway."
        ));
    }
    lines.push(format!("Filename: {}", metadata.filename));
    lines.push(format!("Type: {}", metadata.category));
    if let Some(size) = metadata.known_size() {
        lines.push(format!("Size: {:.1} MB", megabytes(size)));
    }
    lines.push(format!("Source: {}", metadata.source_url));
    lines.push(format!("Save path: {}", target.display()));
    lines.push(thin_rule());
    lines
}

pub fn print_probe(probe: &ProbeOutcome, target: &Path) {
    print_lines(&probe_lines(probe, target));
}

pub fn success_lines(done: &CompletedDownload) -> Vec<String> {
    let name = done.path.file_name().map_or_else(
        || done.path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    );
    vec![
        "Download completed successfully!".to_string(),
        format!("File: {name}"),
        format!("Size: {:.2} MB", megabytes(done.size_bytes)),
        format!("Time: {:.1} seconds", done.elapsed.as_secs_f64()),
        format!("Speed: {:.1} MB/s", done.throughput_mbps()),
        format!("Location: {}", done.path.display()),
        thick_rule(),
    ]
}

pub fn print_success(done: &CompletedDownload) {
    print_lines(&success_lines(done));
}

pub fn failure_lines(failed: &FailedDownload) -> Vec<String> {
    let mut lines = vec![format!("Download failed: {}", failed.error)];
    if failed.partial_removed {
        lines.push(format!("Removed partial file {}", failed.target.display()));
    }
    lines
}

pub fn print_failure(failed: &FailedDownload) {
    print_lines(&failure_lines(failed));
}

/// Session statistics report.
pub fn stats_lines(snapshot: &StatsSnapshot, output_dir: &Path) -> Vec<String> {
    vec![
        "Download Statistics:".to_string(),
        format!("Total downloads: {}", snapshot.download_count),
        format!("Total size: {:.2} MB", megabytes(snapshot.total_bytes)),
        format!(
            "Session duration: {}",
            format_session_duration(snapshot.session_duration)
        ),
        format!("Download directory: {}", output_dir.display()),
        thick_rule(),
    ]
}

pub fn print_stats(snapshot: &StatsSnapshot, output_dir: &Path) {
    print_lines(&stats_lines(snapshot, output_dir));
}

pub fn print_invalid_input() {
    println!("{INVALID_INPUT_MESSAGE}");
    println!("{INVALID_INPUT_EXAMPLE}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    use ir_downloader_core::download::DownloadError;
    use ir_downloader_core::{FileCategory, ResourceMetadata};

    fn metadata(size_bytes: u64) -> ResourceMetadata {
        ResourceMetadata {
            filename: "photo.png".to_string(),
            size_bytes,
            category: FileCategory::Image,
            content_type: "image/png".to_string(),
            source_url: "https://example.com/photo.png".to_string(),
        }
    }

    #[test]
    fn test_header_names_platform_and_directory() {
        let lines = header_lines(
            Platform::Linux,
            "x86_64",
            Path::new("/home/u/Downloads/IR_Downloads"),
        );
        assert!(lines[0].starts_with("IR Downloader v"));
        assert_eq!(lines[1], "Platform: linux (x86_64)");
        assert_eq!(lines[2], "Download directory: /home/u/Downloads/IR_Downloads");
    }

    #[test]
    fn test_probe_lines_resolved_with_size() {
        let probe = ProbeOutcome::Resolved(metadata(3 * 1024 * 1024));
        let lines = probe_lines(&probe, Path::new("/dl/photo.png"));
        assert_eq!(lines[0], "Filename: photo.png");
        assert_eq!(lines[1], "Type: Image");
        assert_eq!(lines[2], "Size: 3.0 MB");
        assert_eq!(lines[3], "Source: https://example.com/photo.png");
        assert_eq!(lines[4], "Save path: /dl/photo.png");
    }

    #[test]
    fn test_probe_lines_omit_unknown_size() {
        let probe = ProbeOutcome::Resolved(metadata(0));
        let lines = probe_lines(&probe, Path::new("/dl/photo.png"));
        assert!(lines.iter().all(|line| !line.starts_with("Size:")));
    }

    #[test]
    fn test_probe_lines_degraded_notice_comes_first() {
        let error = DownloadError::http_status("https://example.com/x", 405);
        let probe = ProbeOutcome::degraded("https://example.com/x", &error);
        let lines = probe_lines(&probe, Path::new("/dl/x.bin"));
        assert!(lines[0].starts_with("Could not inspect URL (server answered HTTP 405)"));
        assert!(lines.contains(&"Type: Unknown".to_string()));
    }

    #[test]
    fn test_success_lines_format_numbers() {
        let done = CompletedDownload {
            path: PathBuf::from("/dl/photo.png"),
            probe: ProbeOutcome::Resolved(metadata(0)),
            size_bytes: 2 * 1024 * 1024,
            elapsed: Duration::from_secs(4),
        };
        let lines = success_lines(&done);
        assert_eq!(lines[1], "File: photo.png");
        assert_eq!(lines[2], "Size: 2.00 MB");
        assert_eq!(lines[3], "Time: 4.0 seconds");
        assert_eq!(lines[4], "Speed: 0.5 MB/s");
        assert_eq!(lines[5], "Location: /dl/photo.png");
    }

    #[test]
    fn test_failure_lines_mention_removed_partial() {
        let failed = FailedDownload {
            target: PathBuf::from("/dl/big.iso"),
            probe: ProbeOutcome::Resolved(metadata(0)),
            error: DownloadError::timeout("https://example.com/big.iso"),
            partial_removed: true,
        };
        let lines = failure_lines(&failed);
        assert!(lines[0].starts_with("Download failed: "));
        assert_eq!(lines[1], "Removed partial file /dl/big.iso");
    }

    #[test]
    fn test_stats_lines() {
        let snapshot = StatsSnapshot {
            download_count: 3,
            total_bytes: 1024 * 1024 + 512 * 1024,
            session_duration: Duration::from_secs(3_725),
        };
        let lines = stats_lines(&snapshot, Path::new("/dl"));
        assert_eq!(lines[1], "Total downloads: 3");
        assert_eq!(lines[2], "Total size: 1.50 MB");
        assert_eq!(lines[3], "Session duration: 1:02:05");
        assert_eq!(lines[4], "Download directory: /dl");
    }
}
