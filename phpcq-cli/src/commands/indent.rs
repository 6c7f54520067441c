//! `phpcq indent-with-tabs`: re-indent PHP files with tabs.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use phpcq_checks::FinderRules;
use phpcq_fixer::FixerPipeline;

/// Arguments for `phpcq indent-with-tabs`.
#[derive(Args, Debug)]
pub struct IndentArgs {
    /// Files or directories to fix. Directories are scanned for `*.php`,
    /// skipping `vendor/` and dot directories; files named here are fixed
    /// whatever their extension.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// List files that would change without writing them; exits 1 if any would.
    #[arg(long)]
    pub dry_run: bool,
}

impl IndentArgs {
    pub fn run(self) -> Result<ExitCode> {
        let pipeline = FixerPipeline::indent_with_tabs();
        let prefix = if self.dry_run { "[dry-run] " } else { "" };

        let mut changed = 0usize;
        for (file, explicit) in expand(&self.paths)? {
            let fixed = if explicit {
                pipeline.force_fix_file(&file, self.dry_run)
            } else {
                pipeline.fix_file(&file, self.dry_run)
            }
            .with_context(|| format!("failed to fix {}", file.display()))?;
            if fixed {
                changed += 1;
                let marker = if self.dry_run { "~" } else { "✎" };
                println!("{prefix}  {marker}  {}", file.display());
            }
        }
        tracing::info!(changed, dry_run = self.dry_run, "indentation pass finished");

        if self.dry_run && changed > 0 {
            return Ok(ExitCode::FAILURE);
        }
        Ok(ExitCode::SUCCESS)
    }
}

/// Files named directly (flagged `true`) plus the PHP files found under
/// named directories.
fn expand(paths: &[PathBuf]) -> Result<Vec<(PathBuf, bool)>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let found = FinderRules::default()
                .resolve(path)
                .with_context(|| format!("failed to scan {}", path.display()))?;
            files.extend(found.iter().map(|rel| (path.join(rel), false)));
        } else {
            files.push((path.clone(), true));
        }
    }
    Ok(files)
}
