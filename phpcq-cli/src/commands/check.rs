//! `phpcq check-staged-files`: run the gate against staged files.

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use phpcq_checks::{lockfile, style, syntax, CheckError};
use phpcq_core::{config, CommandRunner, Report, SystemRunner};
use phpcq_vcs::{with_repository, Repository, VcsError};

use crate::report::Printer;

/// Arguments for `phpcq check-staged-files` (none).
#[derive(Args, Debug)]
pub struct CheckArgs {}

impl CheckArgs {
    pub fn run(self) -> Result<ExitCode> {
        let cwd = std::env::current_dir().context("could not determine current directory")?;
        let stdout = io::stdout();
        let mut printer = Printer::new(stdout.lock());
        let code = check_staged_files(&SystemRunner, &cwd, &mut printer)?;
        Ok(ExitCode::from(code))
    }
}

/// Open the repository at `cwd`, run every check and print the report.
/// Returns the process exit code.
///
/// Discovery uses the search paths of the `.phpcq.yaml` in `cwd` (if any);
/// the checks use the one in the repository's working directory.
pub fn check_staged_files<R, W>(runner: &R, cwd: &Path, printer: &mut Printer<W>) -> Result<u8>
where
    R: CommandRunner,
    W: Write,
{
    let discovery = config::load_at(cwd).context("could not load gate configuration")?;
    printer.header()?;

    let outcome = with_repository(runner, cwd, &discovery.vcs.search_paths, |repo| {
        run_checks(runner, repo, printer)
    });
    match outcome {
        Ok(result) => result,
        Err(err @ VcsError::NotFound { .. }) => {
            printer.fatal(&err.to_string())?;
            Ok(1)
        }
        Err(err) => Err(err).context("could not open the repository"),
    }
}

fn run_checks<R, W>(runner: &R, repo: &dyn Repository, printer: &mut Printer<W>) -> Result<u8>
where
    R: CommandRunner,
    W: Write,
{
    let config = config::load_at(repo.work_dir()).context("could not load gate configuration")?;
    tracing::debug!(staged = repo.staged_files().len(), kind = %repo.kind(), "running checks");
    let mut report = Report::default();

    let composer = lockfile::check(repo, &config.lockfile).context("composer sync check failed")?;
    printer.result(&composer)?;
    report.push(composer);

    let syntax = syntax::check(runner, repo, &config.syntax).context("syntax check failed")?;
    printer.result(&syntax)?;
    if !syntax.is_pass() {
        printer.syntax_hint(&config.syntax.command, &syntax.failures)?;
    }

    let style = match style::check(runner, repo, &config.style, &syntax.failures) {
        Ok(style) => style,
        Err(err @ CheckError::StyleConfigMissing { .. }) => {
            printer.fatal(&err.to_string())?;
            return Ok(1);
        }
        Err(err) => return Err(err).context("coding style check failed"),
    };
    report.push(syntax);
    printer.result(&style)?;
    if !style.is_pass() {
        printer.style_hint(&config.style.fix_hint)?;
    }
    report.push(style);

    match serde_json::to_string(&report) {
        Ok(json) => tracing::info!(report = %json, "checks finished"),
        Err(err) => tracing::warn!(error = %err, "could not serialize report"),
    }

    if report.is_success() {
        printer.blank_line()?;
    }
    Ok(report.exit_code())
}
