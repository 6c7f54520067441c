//! Error types for phpcq-fixer.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixerError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> FixerError {
    FixerError::Io {
        path: path.into(),
        source,
    }
}
