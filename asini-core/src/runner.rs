//! Process execution port and its production implementation.

use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tracing::debug;

use crate::command::{CommandDescriptor, StdioMode};
use crate::error::{Error, Result};

/// Runs [`CommandDescriptor`]s.
///
/// Both facades go through this trait so that callers (and tests) can swap
/// the process layer without touching command construction.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Runs the command to completion on the calling thread.
    ///
    /// Returns stdout with surrounding whitespace trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CommandExecution`] if the process cannot be spawned or
    /// exits with a non-zero status.
    fn exec_sync(&self, command: &CommandDescriptor) -> Result<String>;

    /// Asynchronous counterpart of [`exec_sync`](Self::exec_sync).
    async fn exec(&self, command: &CommandDescriptor) -> Result<String>;

    /// Spawns the command with its configured stdio and waits for it to exit.
    async fn spawn(&self, command: &CommandDescriptor) -> Result<()>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

fn stdio_for(mode: StdioMode) -> Stdio {
    match mode {
        StdioMode::Inherit => Stdio::inherit(),
        StdioMode::Piped => Stdio::piped(),
        StdioMode::Null => Stdio::null(),
    }
}

fn spawn_error(command: &CommandDescriptor, err: std::io::Error) -> Error {
    Error::CommandExecution {
        command: command.to_string(),
        message: format!("Failed to spawn: {}", err),
    }
}

fn check_status(command: &CommandDescriptor, status: ExitStatus, stderr: &[u8]) -> Result<()> {
    if status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(stderr).trim().to_string();
    let message = if stderr.is_empty() {
        format!("exited with {}", status)
    } else {
        stderr
    };

    Err(Error::CommandExecution {
        command: command.to_string(),
        message,
    })
}

fn build_std(command: &CommandDescriptor) -> std::process::Command {
    let stdio = command.stdio_config();
    let mut cmd = std::process::Command::new(command.program());
    cmd.args(command.arguments())
        .envs(command.envs())
        .stdin(stdio_for(stdio.stdin))
        .stdout(stdio_for(stdio.stdout))
        .stderr(stdio_for(stdio.stderr));
    if let Some(dir) = command.cwd() {
        cmd.current_dir(dir);
    }
    cmd
}

fn build_tokio(command: &CommandDescriptor) -> tokio::process::Command {
    tokio::process::Command::from(build_std(command))
}

#[async_trait]
impl ProcessRunner for SystemRunner {
    fn exec_sync(&self, command: &CommandDescriptor) -> Result<String> {
        debug!(command = %command, cwd = ?command.cwd(), "exec");

        let output = build_std(command)
            .stdout(Stdio::piped())
            .output()
            .map_err(|e| spawn_error(command, e))?;

        check_status(command, output.status, &output.stderr)?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn exec(&self, command: &CommandDescriptor) -> Result<String> {
        debug!(command = %command, cwd = ?command.cwd(), "exec");

        let output = build_tokio(command)
            .stdout(Stdio::piped())
            .output()
            .await
            .map_err(|e| spawn_error(command, e))?;

        check_status(command, output.status, &output.stderr)?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn spawn(&self, command: &CommandDescriptor) -> Result<()> {
        debug!(command = %command, cwd = ?command.cwd(), "spawn");

        let child = build_tokio(command)
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| spawn_error(command, e))?;

        // Piped streams must be drained or the child can block on a full pipe.
        let output = child
            .wait_with_output()
            .await
            .map_err(|e| spawn_error(command, e))?;

        check_status(command, output.status, &output.stderr)
    }
}
