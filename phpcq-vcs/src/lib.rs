//! # phpcq-vcs
//!
//! Version-control adapters behind one capability set ([`Repository`]):
//! the staged file list, a tracked-file query, the repository root and the
//! directory the checks run against.
//!
//! | Backend   | Staged files                          | Working directory          |
//! |-----------|---------------------------------------|----------------------------|
//! | Git       | index vs `HEAD`, `--diff-filter=ACMR` | fresh snapshot of the index|
//! | Mercurial | `hg status --added --modified`        | the live working tree      |
//!
//! Use [`with_repository`] from orchestration code: it discovers the backend,
//! hands the adapter to a closure and always releases the Git snapshot
//! afterwards.

mod detect;
mod error;
pub mod git;
pub mod mercurial;
pub mod snapshot;

use std::fmt;
use std::path::{Path, PathBuf};

use phpcq_core::{CommandRunner, Invocation, Outcome};

pub use detect::{candidate_binaries, detect, Detected};
pub use error::VcsError;
pub use git::GitRepository;
pub use mercurial::MercurialRepository;
pub use snapshot::Snapshot;

// ---------------------------------------------------------------------------
// Capability set
// ---------------------------------------------------------------------------

/// Which VCS backs a [`Repository`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VcsKind {
    Git,
    Mercurial,
}

impl fmt::Display for VcsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VcsKind::Git => write!(f, "git"),
            VcsKind::Mercurial => write!(f, "mercurial"),
        }
    }
}

/// Uniform view of a working copy.
pub trait Repository {
    fn kind(&self) -> VcsKind;

    /// Paths pending commit, relative to the root, in VCS order.
    ///
    /// Captured once when the adapter is opened.
    fn staged_files(&self) -> &[String];

    /// Whether `path` (relative to the root) is under version control.
    ///
    /// `Ok(false)` when the VCS reports the path unknown; `Err` only when the
    /// VCS binary cannot be run.
    fn is_tracked(&self, path: &str) -> Result<bool, VcsError>;

    /// The VCS's canonical top-level directory.
    fn root_dir(&self) -> &Path;

    /// Directory the checks read files from.
    fn work_dir(&self) -> &Path;

    /// Release resources held by the adapter and report any failure doing so.
    fn close(self: Box<Self>) -> Result<(), VcsError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Opening
// ---------------------------------------------------------------------------

/// Discover the VCS in effect at `cwd` and open the matching adapter.
pub fn open<'r, R>(
    runner: R,
    cwd: &Path,
    search_paths: &[String],
) -> Result<Box<dyn Repository + 'r>, VcsError>
where
    R: CommandRunner + 'r,
{
    let Some(found) = detect(&runner, cwd, search_paths) else {
        return Err(VcsError::NotFound {
            cwd: cwd.to_path_buf(),
        });
    };
    tracing::info!(kind = %found.kind, binary = %found.binary.display(), "detected repository");

    Ok(match found.kind {
        VcsKind::Git => Box::new(GitRepository::open(runner, found.binary, cwd)?),
        VcsKind::Mercurial => Box::new(MercurialRepository::open(runner, found.binary, cwd)?),
    })
}

/// Open the repository at `cwd`, run `f` against it, then close it.
///
/// The adapter is closed on every path out of `f`; a panic inside `f` still
/// removes the Git snapshot through its guard. A failure to clean up is logged
/// and does not replace `f`'s result.
pub fn with_repository<R, T, F>(
    runner: R,
    cwd: &Path,
    search_paths: &[String],
    f: F,
) -> Result<T, VcsError>
where
    R: CommandRunner,
    F: FnOnce(&dyn Repository) -> T,
{
    let repo = open(runner, cwd, search_paths)?;
    let value = f(repo.as_ref());
    if let Err(err) = repo.close() {
        tracing::warn!(error = %err, "failed to clean up repository snapshot");
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Run a required VCS command; a nonzero exit is a hard error.
pub(crate) fn must_run<R: CommandRunner>(
    runner: &R,
    invocation: Invocation,
) -> Result<Outcome, VcsError> {
    let outcome = runner.run(&invocation)?;
    if !outcome.success {
        return Err(VcsError::CommandFailed {
            command: invocation.to_string(),
            code: outcome.code,
            stderr: outcome.stderr,
        });
    }
    Ok(outcome)
}

pub(crate) fn canonical(path: &Path) -> Result<PathBuf, VcsError> {
    path.canonicalize().map_err(|e| error::io_err(path, e))
}
