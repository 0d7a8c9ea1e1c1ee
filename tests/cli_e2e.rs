//! End-to-end CLI tests for the ir-downloader binary.

// `Command::cargo_bin` is deprecated in assert_cmd >=2.0.17 in favor of
// `cargo::cargo_bin_cmd!` macro. Suppressed until migration to the new API.
#![allow(deprecated)]

mod support;

use assert_cmd::Command;
use predicates::prelude::*;
use support::socket_guard::start_mock_server_or_skip;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

/// Command with an isolated config home and download directory.
fn downloader(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ir-downloader").unwrap();
    cmd.env("XDG_CONFIG_HOME", temp.path().join("config"))
        .env_remove("RUST_LOG")
        .arg("--output-dir")
        .arg(temp.path().join("downloads"));
    cmd
}

fn write_config(temp: &TempDir, contents: &str) {
    let config_dir = temp.path().join("config").join("ir-downloader");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), contents).unwrap();
}

#[test]
fn test_help_lists_options() {
    Command::cargo_bin("ir-downloader")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--output-dir"))
        .stdout(predicate::str::contains("--keep-partial"));
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("ir-downloader")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_stats_then_exit() {
    let temp = TempDir::new().unwrap();
    downloader(&temp)
        .write_stdin("stats\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("IR Downloader v"))
        .stdout(predicate::str::contains("Total downloads: 0"))
        .stdout(predicate::str::contains("Session duration: 0:00:0"))
        .stdout(predicate::str::contains("Thank you for using IR Downloader!"));
    assert!(temp.path().join("downloads").is_dir());
}

#[test]
fn test_invalid_input_shows_example_and_continues() {
    let temp = TempDir::new().unwrap();
    downloader(&temp)
        .write_stdin("example.com/file.zip\n\nQUIT\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("URL must start with http:// or https://"))
        .stdout(predicate::str::contains("Example: https://example.com/file.zip"))
        .stdout(predicate::str::contains("Thank you for using IR Downloader!"));
}

#[test]
fn test_end_of_input_behaves_like_exit() {
    let temp = TempDir::new().unwrap();
    downloader(&temp)
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Download Statistics:"));
}

#[test]
fn test_invalid_config_file_is_reported() {
    let temp = TempDir::new().unwrap();
    write_config(&temp, "probe_timeout_secs = 0\n");
    downloader(&temp)
        .write_stdin("exit\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("probe_timeout_secs"));
}

#[test]
fn test_one_shot_failure_exit_code() {
    let temp = TempDir::new().unwrap();
    downloader(&temp)
        .arg("not-a-url")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Total downloads: 0"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_one_shot_download_success_and_partial() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("HEAD"))
        .and(path("/files/report.pdf"))
        .respond_with(ResponseTemplate::new(200).insert_header("Content-Type", "application/pdf"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/report.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7 test".to_vec()))
        .mount(&mock_server)
        .await;

    let temp = TempDir::new().unwrap();
    let good = format!("{}/files/report.pdf", mock_server.uri());
    let missing = format!("{}/files/missing.pdf", mock_server.uri());

    downloader(&temp)
        .arg(&good)
        .assert()
        .success()
        .stdout(predicate::str::contains("Filename: report.pdf"))
        .stdout(predicate::str::contains("Type: PDF"))
        .stdout(predicate::str::contains("Download completed successfully!"))
        .stdout(predicate::str::contains("Total downloads: 1"));
    assert_eq!(
        std::fs::read(temp.path().join("downloads").join("report.pdf")).unwrap(),
        b"%PDF-1.7 test"
    );

    downloader(&temp)
        .arg(&good)
        .arg(&missing)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Download failed:"))
        .stdout(predicate::str::contains("report_1.pdf"));
}

#[cfg(unix)]
mod interrupt {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::path::Path;
    use std::process::{Child, ChildStdout, Command, Stdio};
    use std::thread;
    use std::time::{Duration, Instant};

    use tempfile::TempDir;

    use crate::support::socket_guard::should_skip_socket_bound_test;

    const PROMPT: &str = "Enter URL ('stats' for statistics, 'exit' to quit): ";

    fn spawn_downloader(temp: &TempDir, urls: &[&str]) -> Child {
        Command::new(assert_cmd::cargo::cargo_bin("ir-downloader"))
            .env("XDG_CONFIG_HOME", temp.path().join("config"))
            .env_remove("RUST_LOG")
            .arg("--output-dir")
            .arg(temp.path().join("downloads"))
            .args(urls)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap()
    }

    fn send_sigint(child: &Child) {
        let status = Command::new("kill")
            .arg("-INT")
            .arg(child.id().to_string())
            .status()
            .unwrap();
        assert!(status.success());
    }

    /// Reads stdout until `needle` shows up or the stream ends.
    fn read_until(stdout: &mut ChildStdout, needle: &str) -> String {
        let mut seen = Vec::new();
        let mut buf = [0u8; 256];
        while !String::from_utf8_lossy(&seen).contains(needle) {
            let read = stdout.read(&mut buf).unwrap();
            if read == 0 {
                break;
            }
            seen.extend_from_slice(&buf[..read]);
        }
        String::from_utf8_lossy(&seen).into_owned()
    }

    fn wait_for_file(path: &Path, deadline: Duration) -> bool {
        let started = Instant::now();
        while started.elapsed() < deadline {
            if path.exists() {
                return true;
            }
            thread::sleep(Duration::from_millis(20));
        }
        false
    }

    /// Declares a large body, sends the first few KiB of it, then stalls.
    fn serve_stalled_body() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut socket) = stream else { break };
                thread::spawn(move || {
                    let mut request = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut buf) {
                            Ok(0) | Err(_) => return,
                            Ok(read) => request.extend_from_slice(&buf[..read]),
                        }
                    }
                    let head = "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\n\
                                Content-Length: 1000000\r\n\r\n";
                    if socket.write_all(head.as_bytes()).is_err() {
                        return;
                    }
                    if request.starts_with(b"GET") {
                        let _ = socket.write_all(&[1u8; 16 * 1024]);
                        let _ = socket.flush();
                        thread::sleep(Duration::from_secs(60));
                    }
                });
            }
        });
        format!("http://{addr}/big/archive.bin")
    }

    #[test]
    fn test_ctrl_c_at_prompt_reports_stats_and_exits_130() {
        let temp = TempDir::new().unwrap();
        let mut child = spawn_downloader(&temp, &[]);
        let stdin = child.stdin.take();
        let mut stdout = child.stdout.take().unwrap();

        let before = read_until(&mut stdout, PROMPT);
        assert!(before.contains(PROMPT), "no prompt in {before:?}");
        // let the command loop start listening for the signal
        thread::sleep(Duration::from_millis(500));
        send_sigint(&child);

        let mut after = String::new();
        stdout.read_to_string(&mut after).unwrap();
        let status = child.wait().unwrap();
        drop(stdin);

        assert_eq!(status.code(), Some(130), "stdout: {after}");
        assert!(after.contains("Download interrupted by user"), "got {after}");
        assert!(after.contains("Download Statistics:"), "got {after}");
        assert!(after.contains("Total downloads: 0"), "got {after}");
    }

    #[test]
    fn test_ctrl_c_mid_transfer_removes_partial_file() {
        if should_skip_socket_bound_test() {
            return;
        }
        let temp = TempDir::new().unwrap();
        let url = serve_stalled_body();
        let partial = temp.path().join("downloads").join("archive.bin");

        let mut child = spawn_downloader(&temp, &[&url]);
        if !wait_for_file(&partial, Duration::from_secs(15)) {
            let _ = child.kill();
            panic!("transfer never started writing {}", partial.display());
        }
        thread::sleep(Duration::from_millis(200));
        send_sigint(&child);

        let output = child.wait_with_output().unwrap();
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert_eq!(output.status.code(), Some(130), "stdout: {stdout}");
        assert!(stdout.contains("Download interrupted by user"), "got {stdout}");
        assert!(stdout.contains("Download Statistics:"), "got {stdout}");
        assert!(!partial.exists(), "partial file was left behind");
    }
}
