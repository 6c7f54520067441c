//! Throwaway copy of the Git index.
//!
//! A [`Snapshot`] owns a uniquely-named directory under the system temp dir.
//! [`Snapshot::close`] removes it and reports failures; if the guard is
//! dropped without being closed (early return, `?`, panic unwind) the
//! directory is removed in `Drop` and failures are only logged.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::{io_err, VcsError};

/// Prefix of every snapshot directory name.
pub const SNAPSHOT_PREFIX: &str = "phpcq-";

#[derive(Debug)]
pub struct Snapshot {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl Snapshot {
    /// Create an empty, uniquely-named directory in the system temp dir.
    pub fn create() -> Result<Self, VcsError> {
        Self::create_in(std::env::temp_dir())
    }

    /// Create an empty, uniquely-named directory under `parent`.
    pub fn create_in(parent: impl AsRef<Path>) -> Result<Self, VcsError> {
        let parent = parent.as_ref();
        let dir = tempfile::Builder::new()
            .prefix(SNAPSHOT_PREFIX)
            .tempdir_in(parent)
            .map_err(|e| io_err(parent, e))?;
        // Resolve symlinked temp roots so paths handed to tools are canonical.
        let path = dir.path().canonicalize().map_err(|e| io_err(dir.path(), e))?;
        tracing::debug!(path = %path.display(), "created snapshot directory");
        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the directory now.
    pub fn close(mut self) -> Result<(), VcsError> {
        match self.dir.take() {
            Some(dir) => {
                dir.close().map_err(|e| io_err(&self.path, e))?;
                tracing::debug!(path = %self.path.display(), "removed snapshot directory");
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl Drop for Snapshot {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            match dir.close() {
                Ok(()) => {
                    tracing::debug!(path = %self.path.display(), "removed snapshot directory")
                }
                Err(err) => tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "failed to remove snapshot directory"
                ),
            }
        }
    }
}
