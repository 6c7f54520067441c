//! Mercurial adapter.
//!
//! Mercurial has no separate staging copy, so the working directory is the
//! live working tree and "staged" means added or modified.

use std::path::{Path, PathBuf};

use phpcq_core::{CommandRunner, Invocation};

use crate::error::VcsError;
use crate::{must_run, Repository, VcsKind};

#[derive(Debug)]
pub struct MercurialRepository<R> {
    runner: R,
    binary: PathBuf,
    root: PathBuf,
    files: Vec<String>,
}

impl<R: CommandRunner> MercurialRepository<R> {
    /// Open the repository containing `cwd`.
    pub fn open(runner: R, binary: impl Into<PathBuf>, cwd: &Path) -> Result<Self, VcsError> {
        let binary = binary.into();

        let root = must_run(
            &runner,
            Invocation::new(&binary).arg("root").current_dir(cwd),
        )?;
        let root = PathBuf::from(root.stdout.trim());

        let files = must_run(
            &runner,
            Invocation::new(&binary)
                .args(["status", "--added", "--modified", "--no-status"])
                .current_dir(&root),
        )?
        .stdout_lines();
        tracing::info!(root = %root.display(), count = files.len(), "opened mercurial repository");

        Ok(Self {
            runner,
            binary,
            root,
            files,
        })
    }
}

impl<R: CommandRunner> Repository for MercurialRepository<R> {
    fn kind(&self) -> VcsKind {
        VcsKind::Mercurial
    }

    fn staged_files(&self) -> &[String] {
        &self.files
    }

    fn is_tracked(&self, path: &str) -> Result<bool, VcsError> {
        let outcome = self.runner.run(
            &Invocation::new(&self.binary)
                .args(["locate", path])
                .current_dir(&self.root),
        )?;
        Ok(outcome.success)
    }

    fn root_dir(&self) -> &Path {
        &self.root
    }

    fn work_dir(&self) -> &Path {
        &self.root
    }
}
