//! Subprocess port.
//!
//! Every external tool (VCS binaries, syntax checker, style tool) is run
//! through [`CommandRunner`], so adapters and checks can be driven by a fake
//! in tests. [`SystemRunner`] blocks until the child exits; there is no
//! timeout.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::RunnerError;

/// A fully-specified process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Program name as a lossy string, for messages.
    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Result of a process that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub success: bool,
    /// `None` when the child was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl Outcome {
    /// A successful exit with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A nonzero exit with the given code and stderr.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Non-empty lines of stdout, split on `\n`, `\r\n` or `\r`.
    pub fn stdout_lines(&self) -> Vec<String> {
        split_lines(&self.stdout)
    }
}

/// Split tool output into non-empty lines, accepting any newline convention.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split(['\n', '\r'])
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Runs external processes.
pub trait CommandRunner {
    /// Run `invocation` to completion.
    ///
    /// A nonzero exit is reported through [`Outcome::success`]; only a failure
    /// to start the process is an error.
    fn run(&self, invocation: &Invocation) -> Result<Outcome, RunnerError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, invocation: &Invocation) -> Result<Outcome, RunnerError> {
        (**self).run(invocation)
    }
}

/// [`CommandRunner`] backed by `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<Outcome, RunnerError> {
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        if let Some(cwd) = &invocation.cwd {
            command.current_dir(cwd);
        }

        tracing::debug!(command = %invocation, cwd = ?invocation.cwd, "running");
        let output = command.output().map_err(|source| RunnerError::Spawn {
            program: invocation.program_name(),
            source,
        })?;

        let outcome = Outcome {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        tracing::debug!(command = %invocation, code = ?outcome.code, "finished");
        Ok(outcome)
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod scripted;
