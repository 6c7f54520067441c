//! VCS discovery.
//!
//! For each search prefix, in order, probe `git rev-parse --git-dir` and then
//! `hg root`; the first probe that exits zero decides the backend and the
//! binary path. A binary that cannot be started simply fails its probe.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use phpcq_core::{CommandRunner, Invocation};

use crate::VcsKind;

/// Result of a successful probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detected {
    pub kind: VcsKind,
    pub binary: PathBuf,
}

/// Candidate binaries in probe order: `git` then `hg` per prefix, each
/// prefix probed once.
pub fn candidate_binaries(search_paths: &[String]) -> Vec<(VcsKind, PathBuf)> {
    let mut seen = HashSet::new();
    search_paths
        .iter()
        .filter(|prefix| seen.insert(prefix.to_string()))
        .flat_map(|prefix| {
            [
                (VcsKind::Git, PathBuf::from(format!("{prefix}git"))),
                (VcsKind::Mercurial, PathBuf::from(format!("{prefix}hg"))),
            ]
        })
        .collect()
}

/// Detect which VCS manages `cwd`.
pub fn detect<R>(runner: &R, cwd: &Path, search_paths: &[String]) -> Option<Detected>
where
    R: CommandRunner + ?Sized,
{
    for (kind, binary) in candidate_binaries(search_paths) {
        let probe = match kind {
            VcsKind::Git => Invocation::new(&binary).args(["rev-parse", "--git-dir"]),
            VcsKind::Mercurial => Invocation::new(&binary).arg("root"),
        }
        .current_dir(cwd);

        match runner.run(&probe) {
            Ok(outcome) if outcome.success => return Some(Detected { kind, binary }),
            Ok(_) => tracing::debug!(binary = %binary.display(), "probe exited nonzero"),
            Err(err) => tracing::debug!(binary = %binary.display(), error = %err, "probe failed"),
        }
    }
    None
}
