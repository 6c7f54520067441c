//! Error types for phpcq-checks.

use std::path::PathBuf;

use thiserror::Error;

use phpcq_core::RunnerError;
use phpcq_vcs::VcsError;

/// Fatal errors raised while running a check.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The style-tool configuration does not exist in the checked tree. The
    /// path is relative to the tree.
    #[error("your project does not contain the coding style configuration file '{}'", path.display())]
    StyleConfigMissing { path: PathBuf },

    /// The style-tool configuration is not valid YAML.
    #[error("failed to parse coding style configuration at {path}: {source}")]
    StyleConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A finder glob does not compile.
    #[error("invalid finder pattern '{pattern}': {source}")]
    Glob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// A finder `in` directory does not exist.
    #[error("finder directory {path} does not exist")]
    FinderDirMissing { path: PathBuf },

    /// Directory traversal failure while resolving finder rules.
    #[error("failed to scan files: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A checker binary could not be started.
    #[error(transparent)]
    Runner(#[from] RunnerError),

    #[error(transparent)]
    Vcs(#[from] VcsError),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CheckError {
    CheckError::Io {
        path: path.into(),
        source,
    }
}
