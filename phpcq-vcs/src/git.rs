//! Git adapter.
//!
//! Opening runs three required commands, each of which aborts the run on
//! failure:
//!
//! 1. `git rev-parse --show-toplevel`: root directory
//! 2. `git diff --cached --name-only -z --diff-filter=ACMR`: staged files
//! 3. `git checkout-index --all --prefix=<snapshot>/`: index snapshot
//!
//! Checks then read from the snapshot, so they see exactly what will be
//! committed rather than the possibly-dirty working tree.
//!
//! Path output is requested NUL-terminated, so names with non-ASCII bytes
//! come back verbatim instead of C-quoted.

use std::path::{Path, PathBuf};

use phpcq_core::{CommandRunner, Invocation};

use crate::error::VcsError;
use crate::snapshot::Snapshot;
use crate::{canonical, must_run, Repository, VcsKind};

#[derive(Debug)]
pub struct GitRepository<R> {
    runner: R,
    binary: PathBuf,
    root: PathBuf,
    files: Vec<String>,
    snapshot: Snapshot,
}

impl<R: CommandRunner> GitRepository<R> {
    /// Open the repository containing `cwd`, snapshotting the index into the
    /// system temp dir.
    pub fn open(runner: R, binary: impl Into<PathBuf>, cwd: &Path) -> Result<Self, VcsError> {
        Self::open_with_snapshot_in(runner, binary, cwd, std::env::temp_dir())
    }

    /// Like [`GitRepository::open`], with the snapshot created under `temp_root`.
    pub fn open_with_snapshot_in(
        runner: R,
        binary: impl Into<PathBuf>,
        cwd: &Path,
        temp_root: impl AsRef<Path>,
    ) -> Result<Self, VcsError> {
        let binary = binary.into();

        let toplevel = must_run(
            &runner,
            Invocation::new(&binary)
                .args(["rev-parse", "--show-toplevel"])
                .current_dir(cwd),
        )?;
        let root = canonical(Path::new(toplevel.stdout.trim()))?;

        let files = must_run(
            &runner,
            Invocation::new(&binary)
                .args(["diff", "--cached", "--name-only", "-z", "--diff-filter=ACMR"])
                .current_dir(&root),
        )?;
        let files = split_nul(&files.stdout);
        tracing::debug!(count = files.len(), "collected staged files");

        // Dropped (and removed) if checkout-index fails below.
        let snapshot = Snapshot::create_in(temp_root)?;
        let prefix = format!("--prefix={}/", snapshot.path().display());
        must_run(
            &runner,
            Invocation::new(&binary)
                .args(["checkout-index", "--all"])
                .arg(prefix)
                .current_dir(&root),
        )?;
        tracing::info!(
            root = %root.display(),
            snapshot = %snapshot.path().display(),
            "materialized index snapshot"
        );

        Ok(Self {
            runner,
            binary,
            root,
            files,
            snapshot,
        })
    }
}

impl<R: CommandRunner> Repository for GitRepository<R> {
    fn kind(&self) -> VcsKind {
        VcsKind::Git
    }

    fn staged_files(&self) -> &[String] {
        &self.files
    }

    fn is_tracked(&self, path: &str) -> Result<bool, VcsError> {
        let outcome = self.runner.run(
            &Invocation::new(&self.binary)
                .args(["ls-files", "--error-unmatch", "-z", "--", path])
                .current_dir(&self.root),
        )?;
        Ok(outcome.success)
    }

    fn root_dir(&self) -> &Path {
        &self.root
    }

    fn work_dir(&self) -> &Path {
        self.snapshot.path()
    }

    fn close(self: Box<Self>) -> Result<(), VcsError> {
        let repo = *self;
        repo.snapshot.close()
    }
}

fn split_nul(output: &str) -> Vec<String> {
    output
        .split('\0')
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use phpcq_core::runner::scripted::ScriptedRunner;
    use phpcq_core::Outcome;
    use tempfile::TempDir;

    fn scripted(root: &Path) -> ScriptedRunner {
        ScriptedRunner::new()
            .on(
                "git",
                &["rev-parse", "--show-toplevel"],
                Outcome::ok(format!("{}\n", root.display())),
            )
            .on(
                "git",
                &["diff", "--cached"],
                Outcome::ok("src/a.php\0src/b.php\0"),
            )
            .on("git", &["checkout-index"], Outcome::ok(""))
            .on("git", &["ls-files", "--error-unmatch", "-z", "--", "composer.json"], Outcome::ok("composer.json\0"))
            .on("git", &["ls-files"], Outcome::failed(1, "error: pathspec did not match"))
    }

    #[test]
    fn open_collects_staged_files_and_snapshots_index() {
        let root = TempDir::new().unwrap();
        let temp = TempDir::new().unwrap();
        let runner = scripted(root.path());

        let repo = GitRepository::open_with_snapshot_in(&runner, "git", root.path(), temp.path())
            .unwrap();
        assert_eq!(repo.kind(), VcsKind::Git);
        assert_eq!(repo.staged_files(), ["src/a.php", "src/b.php"]);
        assert_eq!(repo.root_dir(), root.path().canonicalize().unwrap());
        assert!(repo.work_dir().starts_with(temp.path().canonicalize().unwrap()));
        assert_ne!(repo.work_dir(), repo.root_dir());

        let checkout = runner
            .calls_to("git")
            .into_iter()
            .find(|args| args[0] == "checkout-index")
            .unwrap();
        assert_eq!(
            checkout[2],
            format!("--prefix={}/", repo.work_dir().display())
        );
    }

    #[test]
    fn staged_names_are_split_on_nul_only() {
        assert_eq!(
            split_nul("café.php\0with space.php\0line\nbreak.php\0"),
            ["café.php", "with space.php", "line\nbreak.php"]
        );
        assert!(split_nul("").is_empty());
    }

    #[test]
    fn is_tracked_maps_exit_status() {
        let root = TempDir::new().unwrap();
        let temp = TempDir::new().unwrap();
        let runner = scripted(root.path());
        let repo = GitRepository::open_with_snapshot_in(&runner, "git", root.path(), temp.path())
            .unwrap();

        assert!(repo.is_tracked("composer.json").unwrap());
        assert!(!repo.is_tracked("composer.lock").unwrap());
    }

    #[test]
    fn close_removes_snapshot() {
        let root = TempDir::new().unwrap();
        let temp = TempDir::new().unwrap();
        let runner = scripted(root.path());
        let repo = GitRepository::open_with_snapshot_in(&runner, "git", root.path(), temp.path())
            .unwrap();
        let work_dir = repo.work_dir().to_path_buf();
        assert!(work_dir.exists());

        Box::new(repo).close().unwrap();
        assert!(!work_dir.exists());
    }

    #[test]
    fn failing_rev_parse_is_fatal() {
        let runner = ScriptedRunner::new().on(
            "git",
            &["rev-parse"],
            Outcome::failed(128, "fatal: not a git repository"),
        );
        let err = GitRepository::open(&runner, "git", Path::new("/nowhere")).unwrap_err();
        match err {
            VcsError::CommandFailed { command, code, .. } => {
                assert_eq!(command, "git rev-parse --show-toplevel");
                assert_eq!(code, Some(128));
            }
            other => panic!("expected CommandFailed, got {other:?}"),
        }
    }

    #[test]
    fn failing_checkout_index_leaves_no_snapshot_behind() {
        let root = TempDir::new().unwrap();
        let temp = TempDir::new().unwrap();
        let runner = ScriptedRunner::new()
            .on(
                "git",
                &["rev-parse"],
                Outcome::ok(format!("{}\n", root.path().display())),
            )
            .on("git", &["diff"], Outcome::ok("a.php\0"))
            .on("git", &["checkout-index"], Outcome::failed(1, "index locked"));

        let err = GitRepository::open_with_snapshot_in(&runner, "git", root.path(), temp.path())
            .unwrap_err();
        assert!(matches!(err, VcsError::CommandFailed { .. }), "got: {err}");
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }
}
