//! Command action: run_command

use super::{DISABLED_REASON, optional_str, optional_u64, require_str, resolve_path};
use async_trait::async_trait;
use converge_application::{Action, ActionError};
use converge_domain::Availability;
use serde_json::{Value, json};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const RUN_COMMAND: &str = "run_command";

/// Maximum captured size per stream (1 MB)
const MAX_OUTPUT_SIZE: usize = 1024 * 1024;

const SHELL: &str = "sh";

/// Run a shell command through `sh -c`.
///
/// A zero exit status is a success carrying `exit_code`, `stdout` and
/// `stderr`. A non-zero status is an `execution_failed` failure whose
/// message includes the captured output. The child is killed when the
/// timeout elapses or the run is cancelled.
pub struct RunCommandAction {
    base_dir: PathBuf,
    enabled: bool,
    default_timeout: Duration,
}

impl RunCommandAction {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            enabled: true,
            default_timeout: Duration::from_secs(super::DEFAULT_COMMAND_TIMEOUT_SECS),
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }
}

#[async_trait]
impl Action for RunCommandAction {
    fn name(&self) -> &str {
        RUN_COMMAND
    }

    fn description(&self) -> &str {
        "Execute a shell command and return its output. Arguments: command, working_dir?, timeout_secs?"
    }

    async fn invoke(
        &self,
        arguments: Value,
        cancellation: &CancellationToken,
    ) -> Result<Value, ActionError> {
        let command_str = require_str(&arguments, "command")?;
        let timeout = optional_u64(&arguments, "timeout_secs")?
            .map(Duration::from_secs)
            .unwrap_or(self.default_timeout);

        let working_dir = match optional_str(&arguments, "working_dir")? {
            Some(dir) => resolve_path(&self.base_dir, dir),
            None => self.base_dir.clone(),
        };
        if !working_dir.exists() {
            return Err(ActionError::not_found(format!(
                "Working directory does not exist: {}",
                working_dir.display()
            )));
        }
        if !working_dir.is_dir() {
            return Err(ActionError::invalid_argument(format!(
                "'{}' is not a directory",
                working_dir.display()
            )));
        }

        debug!("run_command in {}: {}", working_dir.display(), command_str);

        let mut child = Command::new(SHELL)
            .args(["-c", command_str])
            .current_dir(&working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ActionError::from_io("Failed to spawn command", &e))?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let collect = async {
            tokio::try_join!(read_capped(stdout), read_capped(stderr), child.wait())
        };

        // An early return drops the child, which kills it.
        let (stdout, stderr, status) = tokio::select! {
            biased;
            _ = cancellation.cancelled() => return Err(ActionError::cancelled()),
            result = tokio::time::timeout(timeout, collect) => match result {
                Ok(collected) => collected
                    .map_err(|e| ActionError::from_io("Failed to wait for command", &e))?,
                Err(_) => {
                    return Err(ActionError::timeout(format!(
                        "Command timed out after {} seconds",
                        timeout.as_secs()
                    )));
                }
            },
        };

        let exit_code = status.code().unwrap_or(-1);
        let stdout = bounded_utf8(&stdout);
        let stderr = bounded_utf8(&stderr);

        if status.success() {
            Ok(json!({
                "exit_code": exit_code,
                "stdout": stdout,
                "stderr": stderr,
            }))
        } else {
            let mut message = format!("Command exited with code {}", exit_code);
            for stream in [&stdout, &stderr] {
                if !stream.trim().is_empty() {
                    message.push('\n');
                    message.push_str(stream.trim_end());
                }
            }
            Err(ActionError::execution_failed(message))
        }
    }

    async fn verify_configuration(&self) -> Availability {
        if !self.enabled {
            return Availability::unavailable(DISABLED_REASON);
        }
        match which::which(SHELL) {
            Ok(_) => Availability::Available,
            Err(e) => Availability::unavailable(format!("'{}' not found on PATH: {}", SHELL, e)),
        }
    }
}

/// Read at most one byte past `MAX_OUTPUT_SIZE`, then discard the rest so
/// the child never blocks on a full pipe.
async fn read_capped<R: AsyncRead + Unpin>(stream: Option<R>) -> io::Result<Vec<u8>> {
    let mut captured = Vec::new();
    let Some(mut stream) = stream else {
        return Ok(captured);
    };
    (&mut stream)
        .take(MAX_OUTPUT_SIZE as u64 + 1)
        .read_to_end(&mut captured)
        .await?;
    tokio::io::copy(&mut stream, &mut tokio::io::sink()).await?;
    Ok(captured)
}

fn bounded_utf8(bytes: &[u8]) -> String {
    let mut text = String::from_utf8_lossy(bytes).into_owned();
    if text.len() > MAX_OUTPUT_SIZE {
        let mut cut = MAX_OUTPUT_SIZE;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push_str("\n... (output truncated)");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn run(action: &RunCommandAction, args: Value) -> Result<Value, ActionError> {
        action.invoke(args, &CancellationToken::new()).await
    }

    #[tokio::test]
    async fn test_run_command_success() {
        let dir = tempdir().unwrap();
        let action = RunCommandAction::new(dir.path());

        let value = run(&action, json!({"command": "echo hello"})).await.unwrap();
        assert_eq!(value["exit_code"], json!(0));
        assert_eq!(value["stdout"], json!("hello\n"));
    }

    #[tokio::test]
    async fn test_run_command_uses_working_dir() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("inner")).unwrap();
        std::fs::write(dir.path().join("inner/marker.txt"), "").unwrap();
        let action = RunCommandAction::new(dir.path());

        let value = run(&action, json!({"command": "ls", "working_dir": "inner"}))
            .await
            .unwrap();
        assert!(value["stdout"].as_str().unwrap().contains("marker.txt"));
    }

    #[tokio::test]
    async fn test_run_command_nonzero_exit_is_failure() {
        let action = RunCommandAction::new(".");
        let error = run(&action, json!({"command": "echo oops >&2; exit 3"}))
            .await
            .unwrap_err();
        assert_eq!(error.kind, "execution_failed");
        assert!(error.message.contains("exited with code 3"));
        assert!(error.message.contains("oops"));
    }

    #[tokio::test]
    async fn test_run_command_caps_large_output() {
        let action = RunCommandAction::new(".");
        let value = run(&action, json!({"command": "yes | head -c 3000000"}))
            .await
            .unwrap();

        let stdout = value["stdout"].as_str().unwrap();
        assert!(stdout.ends_with("(output truncated)"));
        assert!(stdout.len() < MAX_OUTPUT_SIZE + 64);
        assert_eq!(value["exit_code"], json!(0));
    }

    #[tokio::test]
    async fn test_read_capped_stops_at_limit() {
        let input = vec![b'a'; MAX_OUTPUT_SIZE * 2];
        let captured = read_capped(Some(&input[..])).await.unwrap();
        assert_eq!(captured.len(), MAX_OUTPUT_SIZE + 1);

        let none: Option<&[u8]> = None;
        assert!(read_capped(none).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_command_timeout() {
        let action = RunCommandAction::new(".");
        let error = run(&action, json!({"command": "sleep 5", "timeout_secs": 0}))
            .await
            .unwrap_err();
        assert_eq!(error.kind, "timeout");
    }

    #[tokio::test]
    async fn test_run_command_cancelled() {
        let action = RunCommandAction::new(".");
        let token = CancellationToken::new();
        token.cancel();

        let error = action
            .invoke(json!({"command": "sleep 5"}), &token)
            .await
            .unwrap_err();
        assert_eq!(error.kind, "cancelled");
    }

    #[tokio::test]
    async fn test_run_command_missing_working_dir() {
        let dir = tempdir().unwrap();
        let action = RunCommandAction::new(dir.path());
        let error = run(&action, json!({"command": "true", "working_dir": "nope"}))
            .await
            .unwrap_err();
        assert_eq!(error.kind, "not_found");
    }

    #[tokio::test]
    async fn test_verify_configuration() {
        assert!(
            RunCommandAction::new(".")
                .verify_configuration()
                .await
                .is_available()
        );
        assert!(
            !RunCommandAction::new(".")
                .with_enabled(false)
                .verify_configuration()
                .await
                .is_available()
        );
    }

    #[test]
    fn test_bounded_utf8_truncates() {
        let big = vec![b'x'; MAX_OUTPUT_SIZE + 10];
        let text = bounded_utf8(&big);
        assert!(text.ends_with("(output truncated)"));
    }
}
