//! Error types for phpcq-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading `.phpcq.yaml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure other than "file not found".
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error. Includes the file path and serde_yaml's line context.
    #[error("failed to parse gate configuration at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A command vector was configured empty.
    #[error("'{key}' in {path} must name a program")]
    EmptyCommand { path: PathBuf, key: &'static str },
}

/// Errors raised when an external process cannot be run at all.
///
/// A process that runs and exits nonzero is not an error; see
/// [`crate::runner::Outcome::success`].
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}
