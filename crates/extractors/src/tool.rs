//! External tool invocation with timeouts.

use std::path::Path;
use std::time::Duration;
use synthprobe_common::{Error, Result};
use tracing::debug;

/// Captured output of one tool invocation.
#[derive(Debug)]
pub struct ToolOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Whether `binary` resolves on PATH.
pub fn binary_available(binary: &str) -> bool {
    which::which(binary).is_ok()
}

/// Run `binary` with `args`, killing it after `timeout_seconds`.
///
/// Arguments are passed straight to the process, never through a shell, so
/// filenames with spaces or metacharacters need no quoting.
pub async fn run_tool(binary: &str, args: &[&str], timeout_seconds: u64) -> Result<ToolOutput> {
    debug!("Running {} {:?} (timeout {}s)", binary, args, timeout_seconds);

    let future = tokio::process::Command::new(binary)
        .args(args)
        .kill_on_drop(true)
        .output();

    let output = tokio::time::timeout(Duration::from_secs(timeout_seconds), future)
        .await
        .map_err(|_| Error::ToolTimeout {
            tool: binary.to_string(),
            seconds: timeout_seconds,
        })?
        .map_err(|e| Error::ToolExecution {
            tool: binary.to_string(),
            reason: e.to_string(),
        })?;

    Ok(ToolOutput {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Run a tool against one file, the common case.
pub async fn run_tool_on_file(
    binary: &str,
    args: &[&str],
    path: &Path,
    timeout_seconds: u64,
) -> Result<ToolOutput> {
    let path_str = path.to_string_lossy();
    let mut full_args: Vec<&str> = args.to_vec();
    full_args.push(path_str.as_ref());
    run_tool(binary, &full_args, timeout_seconds).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_tool_captures_stdout() {
        let out = run_tool("echo", &["hello"], 5).await.unwrap();
        assert!(out.success());
        assert_eq!(out.stdout.trim(), "hello");
        assert!(out.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_run_tool_nonzero_exit() {
        let out = run_tool("false", &[], 5).await.unwrap();
        assert!(!out.success());
    }

    #[tokio::test]
    async fn test_missing_binary_is_execution_error() {
        let err = run_tool("synthprobe-no-such-binary", &[], 5)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ToolExecution { ref tool, .. } if tool == "synthprobe-no-such-binary"
        ));
    }

    #[tokio::test]
    async fn test_timeout_kills_tool() {
        let err = run_tool("sleep", &["30"], 1).await.unwrap_err();
        assert!(matches!(
            err,
            Error::ToolTimeout { ref tool, seconds: 1 } if tool == "sleep"
        ));
    }

    #[test]
    fn test_binary_available() {
        assert!(binary_available("sh"));
        assert!(!binary_available("synthprobe-no-such-binary"));
    }
}
