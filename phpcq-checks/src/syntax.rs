//! Syntax check: one external syntax-checker process per staged file.
//!
//! Every staged file is checked, in staged order, even after a failure, so
//! the full failing set is reported at once.

use phpcq_core::config::SyntaxConfig;
use phpcq_core::{CheckCategory, CheckResult, CommandRunner, Invocation};
use phpcq_vcs::Repository;

use crate::error::CheckError;
use crate::resolve_program;

/// Run the syntax check over every staged file.
pub fn check<R>(
    runner: &R,
    repo: &dyn Repository,
    config: &SyntaxConfig,
) -> Result<CheckResult, CheckError>
where
    R: CommandRunner + ?Sized,
{
    let Some((program, leading)) = config.command.split_first() else {
        return Ok(CheckResult::pass(CheckCategory::Syntax));
    };
    let program = resolve_program(program, repo.root_dir());

    let mut failures = Vec::new();
    for file in repo.staged_files() {
        let invocation = Invocation::new(&program)
            .args(leading)
            .arg(file)
            .current_dir(repo.work_dir());
        let outcome = runner.run(&invocation)?;
        if !outcome.success {
            tracing::info!(%file, code = ?outcome.code, "syntax check failed");
            failures.push(file.clone());
        }
    }
    Ok(CheckResult::new(CheckCategory::Syntax, failures))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeRepo;
    use phpcq_core::runner::scripted::ScriptedRunner;
    use phpcq_core::Outcome;

    #[test]
    fn failing_set_is_exactly_the_nonzero_files_in_staged_order() {
        let repo = FakeRepo::new().stage(&["d.php", "b.php", "c.php", "a.php"]);
        let runner = ScriptedRunner::new()
            .on("php", &["-l", "a.php"], Outcome::failed(255, "Parse error"))
            .on("php", &["-l", "d.php"], Outcome::failed(255, "Parse error"))
            .on("php", &["-l"], Outcome::ok("No syntax errors detected"));

        let result = check(&runner, &repo, &SyntaxConfig::default()).unwrap();
        assert_eq!(result.category, CheckCategory::Syntax);
        assert_eq!(result.failures, ["d.php", "a.php"]);
    }

    #[test]
    fn every_file_is_checked_after_a_failure_in_the_work_dir() {
        let repo = FakeRepo::new().stage(&["a.php", "b.php", "c.php"]);
        let runner = ScriptedRunner::new().on("php", &["-l"], Outcome::failed(255, ""));

        let result = check(&runner, &repo, &SyntaxConfig::default()).unwrap();
        assert_eq!(result.failures.len(), 3);
        let calls = runner.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls
            .iter()
            .all(|c| c.cwd.as_deref() == Some(repo.dir.path())));
    }

    #[test]
    fn no_staged_files_passes_without_running_anything() {
        let repo = FakeRepo::new();
        let runner = ScriptedRunner::new();
        assert!(check(&runner, &repo, &SyntaxConfig::default()).unwrap().is_pass());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn missing_checker_binary_is_fatal() {
        let repo = FakeRepo::new().stage(&["a.php"]);
        let runner = ScriptedRunner::new().missing("php");
        let err = check(&runner, &repo, &SyntaxConfig::default()).unwrap_err();
        assert!(matches!(err, CheckError::Runner(_)), "got: {err}");
    }
}
