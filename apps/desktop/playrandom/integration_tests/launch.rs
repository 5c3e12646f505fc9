use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStdout, Command};
use tokio::time::timeout as TokioTimeout;
use uuid::Uuid;

// ============================================================================
// Process-level tests: real launches of the playrandom binary
// ============================================================================

const LINE_TIMEOUT: Duration = Duration::from_secs(10);

/// Scratch directories with a space in the path, passed to the binary verbatim.
fn launch_dirs(dir: &TempDir) -> (PathBuf, PathBuf) {
    let root = dir.path().join("Play Random");
    (root.join("logs"), root.join("config"))
}

struct Launch {
    child: Child,
    lines: Lines<BufReader<ChildStdout>>,
}

impl Launch {
    fn spawn(instance_id: &str, dir: &TempDir) -> Self {
        let (log_dir, config_dir) = launch_dirs(dir);
        let mut child = Command::new(env!("CARGO_BIN_EXE_playrandom"))
            .arg("--instance-id")
            .arg(instance_id)
            .arg("--log-dir")
            .arg(&log_dir)
            .arg("--config-dir")
            .arg(&config_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .expect("spawn playrandom");

        let stdout = child.stdout.take().expect("piped stdout");
        Self {
            child,
            lines: BufReader::new(stdout).lines(),
        }
    }

    /// Reads stdout until a line contains `needle`.
    async fn wait_for_line(&mut self, needle: &str) -> String {
        let found = TokioTimeout(LINE_TIMEOUT, async {
            while let Some(line) = self.lines.next_line().await.expect("read stdout") {
                if line.contains(needle) {
                    return Some(line);
                }
            }
            None
        })
        .await;

        match found {
            Ok(Some(line)) => line,
            Ok(None) => panic!("stdout closed before '{needle}'"),
            Err(_) => panic!("no '{needle}' within {LINE_TIMEOUT:?}"),
        }
    }

    async fn kill(mut self) {
        self.child.kill().await.expect("kill playrandom");
    }
}

/// **VALUE**: Verifies the full launch sequence across real processes.
///
/// **WHY THIS MATTERS**: Only separate processes exercise the OS lock and the local
/// endpoint the way users do: first launch runs, second launch forwards and exits 0,
/// and after the first one dies the next launch takes over.
///
/// **BUG THIS CATCHES**: Would catch a Secondary that falls through to normal startup,
/// a Secondary exiting non-zero, or a lock that survives its process.
#[tokio::test]
async fn given_running_primary_when_launched_again_then_forwards_and_exits() {
    // GIVEN: A first launch that becomes Primary
    let dir = TempDir::new().expect("create temp dir");
    let instance_id = format!("test-{}", Uuid::new_v4());

    let mut primary = Launch::spawn(&instance_id, &dir);
    primary.wait_for_line("Running as primary instance").await;
    primary.wait_for_line("Activation server listening").await;

    // WHEN: A second launch runs to completion
    let (log_dir, config_dir) = launch_dirs(&dir);
    let secondary = Command::new(env!("CARGO_BIN_EXE_playrandom"))
        .arg("--instance-id")
        .arg(&instance_id)
        .arg("--log-dir")
        .arg(&log_dir)
        .arg("--config-dir")
        .arg(&config_dir)
        .output();
    let secondary = TokioTimeout(LINE_TIMEOUT, secondary)
        .await
        .expect("secondary exits")
        .expect("run secondary");

    // THEN: It forwarded, exited 0, and the Primary surfaced its window
    let stdout = String::from_utf8_lossy(&secondary.stdout);
    assert!(secondary.status.success(), "secondary failed: {stdout}");
    assert!(stdout.contains("Running as secondary instance"), "{stdout}");
    assert!(stdout.contains("Forwarded BringToFront"), "{stdout}");

    primary.wait_for_line("Window brought to front").await;

    // WHEN: The Primary dies without cleaning up
    primary.kill().await;

    // THEN: The next launch becomes Primary
    let mut next = Launch::spawn(&instance_id, &dir);
    next.wait_for_line("Running as primary instance").await;
    next.kill().await;
}

/// **VALUE**: Verifies an invalid identifier fails the launch with a non-zero status.
///
/// **BUG THIS CATCHES**: Would catch an identifier with a path separator reaching
/// the mutex name.
#[tokio::test]
async fn given_invalid_instance_id_when_launched_then_exits_non_zero() {
    let dir = TempDir::new().expect("create temp dir");
    let (log_dir, config_dir) = launch_dirs(&dir);

    let output = Command::new(env!("CARGO_BIN_EXE_playrandom"))
        .arg("--instance-id")
        .arg("not/valid")
        .arg("--log-dir")
        .arg(&log_dir)
        .arg("--config-dir")
        .arg(&config_dir)
        .output();
    let output = TokioTimeout(LINE_TIMEOUT, output)
        .await
        .expect("launch exits")
        .expect("run launch");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Invalid instance identifier"));
}
