use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tracing::{error, info};

use crate::error::{DeployError, Result};

/// A fully resolved command: program, argument vector, and working directory.
///
/// Commands are always spawned directly from the argv, never through a shell,
/// so payload-derived strings can appear in arguments without being
/// interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    cwd: PathBuf,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Space-joined rendering for logs and error messages. Display only,
    /// never executed.
    pub fn rendered(&self) -> String {
        let mut rendered = self.program.clone();
        for arg in &self.args {
            rendered.push(' ');
            rendered.push_str(arg);
        }
        rendered
    }
}

/// Captured result of a finished command.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn exit_code(&self) -> Option<i32> {
        self.status.code()
    }
}

/// Runs a command to completion, capturing stdout and stderr.
///
/// A non-zero exit becomes `DeployError::CommandFailed` with both streams
/// attached. When a timeout is given the child is killed once it elapses.
pub async fn run(spec: &CommandSpec, timeout: Option<Duration>) -> Result<CommandOutput> {
    let command = spec.rendered();
    info!(command = %command, cwd = %spec.cwd().display(), "running command");

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .current_dir(spec.cwd())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = match timeout {
        Some(limit) => match tokio::time::timeout(limit, cmd.output()).await {
            Ok(result) => result,
            Err(_) => {
                let timeout_secs = limit.as_secs();
                error!(command = %command, timeout_secs, "command timed out");
                return Err(DeployError::CommandTimeout {
                    command,
                    timeout_secs,
                });
            }
        },
        None => cmd.output().await,
    };

    let output = match output {
        Ok(output) => output,
        Err(source) => {
            error!(command = %command, error = %source, "command failed to start");
            return Err(DeployError::CommandSpawn { command, source });
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    let status = output.status;

    if status.success() {
        info!(
            command = %command,
            exit_code = ?status.code(),
            stdout = %stdout.trim_end(),
            stderr = %stderr.trim_end(),
            "command finished"
        );
        Ok(CommandOutput {
            status,
            stdout,
            stderr,
        })
    } else {
        error!(
            command = %command,
            exit_code = ?status.code(),
            stdout = %stdout.trim_end(),
            stderr = %stderr.trim_end(),
            "command failed"
        );
        Err(DeployError::CommandFailed {
            command,
            status,
            stdout,
            stderr,
        })
    }
}
