//! In-memory [`Repository`] over a temp dir, for check tests.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use phpcq_vcs::{Repository, VcsError, VcsKind};
use tempfile::TempDir;

pub(crate) struct FakeRepo {
    pub dir: TempDir,
    pub staged: Vec<String>,
    pub tracked: HashSet<String>,
}

impl FakeRepo {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("tempdir"),
            staged: Vec::new(),
            tracked: HashSet::new(),
        }
    }

    /// Write `path` into the tree and mark it tracked.
    pub fn file(mut self, path: &str, content: &str) -> Self {
        let full = self.dir.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(full, content).expect("write fixture");
        self.tracked.insert(path.to_string());
        self
    }

    /// Write `path` into the tree without tracking it.
    pub fn untracked(mut self, path: &str, content: &str) -> Self {
        self = self.file(path, content);
        self.tracked.remove(path);
        self
    }

    pub fn stage(mut self, paths: &[&str]) -> Self {
        self.staged.extend(paths.iter().map(|p| p.to_string()));
        self
    }
}

impl Repository for FakeRepo {
    fn kind(&self) -> VcsKind {
        VcsKind::Git
    }

    fn staged_files(&self) -> &[String] {
        &self.staged
    }

    fn is_tracked(&self, path: &str) -> Result<bool, VcsError> {
        Ok(self.tracked.contains(path))
    }

    fn root_dir(&self) -> &Path {
        self.dir.path()
    }

    fn work_dir(&self) -> &Path {
        self.dir.path()
    }
}
