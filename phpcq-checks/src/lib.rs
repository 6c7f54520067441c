//! # phpcq-checks
//!
//! The three checks run against a [`phpcq_vcs::Repository`]:
//!
//! - [`lockfile::check`]: manifest hash vs the hash recorded in the lockfile
//! - [`syntax::check`]: external syntax checker, one process per staged file
//! - [`style::check`]: style tool in dry-run mode, one process per registered file
//!
//! Each check returns a [`phpcq_core::CheckResult`]; an `Err` is a fatal
//! precondition failure, never a failing file.

pub mod error;
pub mod finder;
pub mod lockfile;
pub mod style;
pub mod syntax;

#[cfg(test)]
mod testutil;

use std::path::{Path, PathBuf};

pub use error::CheckError;
pub use finder::{FinderRules, RegisteredFiles, StyleToolConfig};

/// Resolve the program of a configured command.
///
/// A relative path with more than one component (`vendor/bin/tool`) is taken
/// relative to the repository root; a bare name is left for `PATH` lookup.
pub(crate) fn resolve_program(program: &str, root: &Path) -> PathBuf {
    let path = Path::new(program);
    if path.is_relative() && path.components().count() > 1 {
        root.join(path)
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("php", "php")]
    #[case("vendor/bin/php-cs-fixer", "/repo/vendor/bin/php-cs-fixer")]
    #[case("/usr/bin/php", "/usr/bin/php")]
    fn program_resolution(#[case] program: &str, #[case] expected: &str) {
        assert_eq!(
            resolve_program(program, Path::new("/repo")),
            PathBuf::from(expected)
        );
    }
}
