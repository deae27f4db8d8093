//! External analysis-launcher invocation.
//!
//! The launcher is the project's own lint script; the only contract it
//! must honor is that it terminates and produces text on stdout/stderr.

use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Errors that abort a lint run before any report is written.
#[derive(Debug, Error)]
pub enum LintError {
    /// The analysis launcher could not be started at all.
    #[error("failed to launch lint script `{script}`: {source}")]
    ToolInvocation {
        script: String,
        #[source]
        source: std::io::Error,
    },

    /// The launcher ran past the configured deadline.
    #[error("lint script `{script}` timed out after {seconds}s")]
    Timeout { script: String, seconds: u64 },
}

/// Run the analysis launcher and capture stdout and stderr as one
/// concatenated stream (stdout first).
///
/// The script's exit status is ignored: lint tools exit non-zero
/// whenever they report issues, and the issue count drives the gate,
/// not the status. Only a failure to start (or an elapsed timeout,
/// when one is configured) is fatal.
pub async fn run_and_collect(
    script: &Path,
    timeout: Option<Duration>,
) -> Result<String, LintError> {
    let script_name = script.display().to_string();

    let mut command = Command::new(script);
    let output_future = command.output();

    let spawn_result = match timeout {
        Some(limit) => tokio::time::timeout(limit, output_future)
            .await
            .map_err(|_| LintError::Timeout {
                script: script_name.clone(),
                seconds: limit.as_secs(),
            })?,
        None => output_future.await,
    };

    let output = spawn_result.map_err(|source| LintError::ToolInvocation {
        script: script_name,
        source,
    })?;

    debug!("lint script exited with status {:?}", output.status.code());

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    Ok(combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_missing_script_is_tool_invocation_error() {
        let result =
            run_and_collect(&PathBuf::from("./definitely_not_a_real_script.sh"), None).await;

        match result {
            Err(LintError::ToolInvocation { script, .. }) => {
                assert!(script.contains("definitely_not_a_real_script"));
            }
            other => panic!("expected ToolInvocation, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_captures_both_streams_and_ignores_exit_status() {
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script_path = dir.path().join("lint_files.sh");
        {
            let mut file = std::fs::File::create(&script_path).unwrap();
            writeln!(file, "#!/bin/sh").unwrap();
            writeln!(file, "echo 'on stdout'").unwrap();
            writeln!(file, "echo 'on stderr' >&2").unwrap();
            writeln!(file, "exit 1").unwrap();
        }
        std::fs::set_permissions(&script_path, std::fs::Permissions::from_mode(0o755)).unwrap();

        let combined = run_and_collect(&script_path, None).await.unwrap();
        assert!(combined.contains("on stdout"));
        assert!(combined.contains("on stderr"));

        // stdout is concatenated ahead of stderr
        let stdout_pos = combined.find("on stdout").unwrap();
        let stderr_pos = combined.find("on stderr").unwrap();
        assert!(stdout_pos < stderr_pos);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_elapses() {
        use std::io::Write;
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script_path = dir.path().join("slow.sh");
        {
            let mut file = std::fs::File::create(&script_path).unwrap();
            writeln!(file, "#!/bin/sh").unwrap();
            writeln!(file, "sleep 5").unwrap();
        }
        std::fs::set_permissions(&script_path, std::fs::Permissions::from_mode(0o755)).unwrap();

        let result = run_and_collect(&script_path, Some(Duration::from_millis(50))).await;
        assert!(matches!(result, Err(LintError::Timeout { .. })));
    }
}
