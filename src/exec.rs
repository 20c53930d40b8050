//! External command execution
//!
//! Every process this tool starts (ssh, git, rm) goes through
//! [`CommandRunner`], so the pipeline can be driven by a scripted runner in
//! tests.

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tracing::debug;

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code (`None` when killed by a signal)
    pub code: Option<i32>,
    /// Captured stdout
    pub stdout: String,
    /// Captured stderr
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given exit code and stderr
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Check if the process exited with status 0
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }

    /// Human-readable exit status
    pub fn status_text(&self) -> String {
        self.code
            .map_or_else(|| "signal".to_string(), |code| format!("status {code}"))
    }

    /// Diagnostic text to show on failure: stderr, or stdout if stderr is empty
    pub fn diagnostics(&self) -> &str {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim()
        } else {
            stderr
        }
    }
}

/// A command to run: program, arguments and working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program name or path
    pub program: String,
    /// Arguments
    pub args: Vec<String>,
    /// Working directory (`None` inherits the current one)
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    /// Create a command for `program` with no arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Append one argument
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run in `dir`
    #[must_use]
    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    /// Command line for display
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

/// Runs external commands to completion
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the command and capture its output
    ///
    /// A non-zero exit is returned as output, not as an error; only failure
    /// to start the process is an error.
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput>;
}

/// Run `command` and turn a non-zero exit into [`Error::ExternalCommand`]
pub async fn run_checked(
    runner: &dyn CommandRunner,
    step: &str,
    command: &CommandSpec,
) -> Result<CommandOutput> {
    let output = runner.run(command).await?;
    if output.success() {
        Ok(output)
    } else {
        Err(Error::ExternalCommand {
            step: step.to_string(),
            command: command.display(),
            status: output.status_text(),
            output: output.diagnostics().to_string(),
        })
    }
}

/// [`CommandRunner`] backed by `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput> {
        debug!(command = %command, cwd = ?command.cwd, "Running external command");

        let mut process = tokio::process::Command::new(&command.program);
        process
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(ref dir) = command.cwd {
            process.current_dir(dir);
        }

        let output = process.output().await.map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("failed to start {}: {e}", command.program),
            ))
        })?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(command = %command.program, status = %result.status_text(), "Command finished");
        Ok(result)
    }
}
