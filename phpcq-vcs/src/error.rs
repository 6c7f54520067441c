//! Error types for phpcq-vcs.

use std::path::PathBuf;

use thiserror::Error;

use phpcq_core::RunnerError;

/// Errors from VCS discovery and adapter operations.
///
/// All of these are fatal preconditions: the run aborts before any check
/// result is produced.
#[derive(Debug, Error)]
pub enum VcsError {
    /// Neither a Git nor a Mercurial working copy was found.
    #[error("'{}' does not seem to be a Git or Mercurial repository", cwd.display())]
    NotFound { cwd: PathBuf },

    /// A required VCS command ran but exited nonzero.
    #[error("'{command}' failed ({}): {}", exit_label(*code), stderr.trim())]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// A VCS binary could not be started.
    #[error(transparent)]
    Runner(#[from] RunnerError),

    /// Filesystem failure around the root directory or the snapshot.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn exit_label(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> VcsError {
    VcsError::Io {
        path: path.into(),
        source,
    }
}
