//! Command execution for tool jobs.

use std::process::ExitStatus;
use thiserror::Error;
use tokio::process::Command;

/// Error type for command execution.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Failed to execute {command}: {error}")]
    Execution { command: String, error: String },
}

/// Captured result of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, or `128 + signal` for a process killed by a signal.
    pub exit_code: Option<i64>,
}

/// Execute a command and capture both streams and the exit code.
///
/// A non-zero exit is reported in [`CommandOutput::exit_code`], not as an
/// error; deciding whether it failed is up to the rule set.
pub async fn run_command(cmd: &mut Command, name: &str) -> Result<CommandOutput, CommandError> {
    let output = cmd.output().await.map_err(|e| CommandError::Execution {
        command: name.to_string(),
        error: e.to_string(),
    })?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code: exit_code(output.status),
    })
}

fn exit_code(status: ExitStatus) -> Option<i64> {
    status.code().map(i64::from).or_else(|| signal_exit_code(status))
}

#[cfg(unix)]
fn signal_exit_code(status: ExitStatus) -> Option<i64> {
    use std::os::unix::process::ExitStatusExt;
    status.signal().map(|sig| 128 + i64::from(sig))
}

#[cfg(not(unix))]
fn signal_exit_code(_status: ExitStatus) -> Option<i64> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_command_captures_streams() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo hello; echo oops >&2; exit 3"]);
        let output = run_command(&mut cmd, "sh").await.unwrap();
        assert_eq!(output.stdout, "hello\n");
        assert_eq!(output.stderr, "oops\n");
        assert_eq!(output.exit_code, Some(3));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_command_signal() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "kill -9 $$"]);
        let output = run_command(&mut cmd, "sh").await.unwrap();
        assert_eq!(output.exit_code, Some(137));
    }

    #[tokio::test]
    async fn test_run_command_not_found() {
        let mut cmd = Command::new("nonexistent_command_12345");
        let result = run_command(&mut cmd, "nonexistent").await;
        assert!(matches!(result, Err(CommandError::Execution { .. })));
    }
}
