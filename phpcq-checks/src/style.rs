//! Coding style check.
//!
//! 1. The style-tool configuration must exist in the working directory;
//!    without it the run cannot continue.
//! 2. Its finder rules are resolved into the registered file set.
//! 3. If the configuration itself is staged, every registered file is in
//!    scope; otherwise only the staged ones.
//! 4. Per candidate: skip if unregistered, fail without running the tool if
//!    it already failed the syntax check, else run the tool in dry-run mode.
//!
//! The tool runs once per file so that failures map to file names.

use phpcq_core::config::StyleConfig;
use phpcq_core::{CheckCategory, CheckResult, CommandRunner, Invocation};
use phpcq_vcs::Repository;

use crate::error::CheckError;
use crate::finder::{self, to_slash, RegisteredFiles};
use crate::resolve_program;

/// Run the style check. `syntax_failures` are reported as style failures
/// without invoking the tool.
pub fn check<R>(
    runner: &R,
    repo: &dyn Repository,
    config: &StyleConfig,
    syntax_failures: &[String],
) -> Result<CheckResult, CheckError>
where
    R: CommandRunner + ?Sized,
{
    let config_path = repo.work_dir().join(&config.config_file);
    if !config_path.is_file() {
        return Err(CheckError::StyleConfigMissing {
            path: config.config_file.clone(),
        });
    }
    let registered = finder::load(&config_path)?
        .finder
        .resolve(repo.work_dir())?;
    tracing::debug!(count = registered.len(), "registered style files");

    let config_name = to_slash(&config.config_file);
    let candidates = scope(repo.staged_files(), &registered, &config_name);

    let Some((program, leading)) = config.command.split_first() else {
        return Ok(CheckResult::pass(CheckCategory::Style));
    };
    let program = resolve_program(program, repo.root_dir());
    let config_flag = format!("--config-file={config_name}");

    let mut failures = Vec::new();
    for file in candidates {
        if !registered.contains(&file) {
            tracing::debug!(%file, "not registered with the style tool, skipping");
            continue;
        }
        if syntax_failures.contains(&file) {
            failures.push(file);
            continue;
        }

        let invocation = Invocation::new(&program)
            .args(leading)
            .arg(&file)
            .args(["--dry-run", config_flag.as_str()])
            .current_dir(repo.work_dir());
        let outcome = runner.run(&invocation)?;
        if !outcome.success {
            tracing::info!(%file, code = ?outcome.code, "coding style violation");
            failures.push(file);
        }
    }
    Ok(CheckResult::new(CheckCategory::Style, failures))
}

/// Files to consider: every registered file when the style configuration is
/// itself staged, the staged files otherwise.
pub fn scope(staged: &[String], registered: &RegisteredFiles, config_name: &str) -> Vec<String> {
    if staged.iter().any(|f| f == config_name) {
        registered.iter().cloned().collect()
    } else {
        staged.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeRepo;
    use phpcq_core::runner::scripted::ScriptedRunner;
    use phpcq_core::Outcome;

    const FIXER: &str = "vendor/bin/php-cs-fixer";

    fn fixer_path(repo: &FakeRepo) -> String {
        repo.dir.path().join(FIXER).display().to_string()
    }

    fn project() -> FakeRepo {
        FakeRepo::new()
            .file(".php_cs.yml", "finder:\n  in: [src]\n")
            .file("src/A.php", "<?php\n")
            .file("src/B.php", "<?php\n")
            .file("src/C.php", "<?php\n")
            .file("docs/D.php", "<?php\n")
    }

    #[test]
    fn missing_configuration_is_fatal() {
        let repo = FakeRepo::new().file("src/A.php", "<?php\n").stage(&["src/A.php"]);
        let runner = ScriptedRunner::new();
        let err = check(&runner, &repo, &StyleConfig::default(), &[]).unwrap_err();
        assert!(matches!(err, CheckError::StyleConfigMissing { .. }), "got: {err}");
        assert!(err.to_string().contains(".php_cs.yml"));
    }

    #[test]
    fn unregistered_files_are_skipped_not_failed() {
        let repo = project().stage(&["docs/D.php", "src/A.php"]);
        let fixer = fixer_path(&repo);
        let runner = ScriptedRunner::new().on(&fixer, &[], Outcome::ok(""));

        let result = check(&runner, &repo, &StyleConfig::default(), &[]).unwrap();
        assert!(result.is_pass());
        assert_eq!(
            runner.calls_to(&fixer),
            [["fix", "src/A.php", "--dry-run", "--config-file=.php_cs.yml"]]
        );
    }

    #[test]
    fn syntax_failures_fail_without_invoking_the_tool() {
        let repo = project().stage(&["src/A.php", "src/B.php"]);
        let fixer = fixer_path(&repo);
        let runner = ScriptedRunner::new().on(&fixer, &[], Outcome::ok(""));

        let result = check(
            &runner,
            &repo,
            &StyleConfig::default(),
            &["src/A.php".to_string()],
        )
        .unwrap();
        assert_eq!(result.failures, ["src/A.php"]);
        let calls = runner.calls_to(&fixer);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][1], "src/B.php");
    }

    #[test]
    fn nonzero_tool_exit_marks_file_failing() {
        let repo = project().stage(&["src/A.php", "src/B.php"]);
        let fixer = fixer_path(&repo);
        let runner = ScriptedRunner::new()
            .on(&fixer, &["fix", "src/B.php"], Outcome::failed(8, ""))
            .on(&fixer, &[], Outcome::ok(""));

        let result = check(&runner, &repo, &StyleConfig::default(), &[]).unwrap();
        assert_eq!(result.failures, ["src/B.php"]);
    }

    #[test]
    fn staged_configuration_widens_scope_to_all_registered_files() {
        let repo = project().stage(&[".php_cs.yml"]);
        let fixer = fixer_path(&repo);
        let runner = ScriptedRunner::new().on(&fixer, &[], Outcome::ok(""));

        check(&runner, &repo, &StyleConfig::default(), &[]).unwrap();
        let checked: Vec<String> = runner
            .calls_to(&fixer)
            .into_iter()
            .map(|args| args[1].clone())
            .collect();
        assert_eq!(checked, ["src/A.php", "src/B.php", "src/C.php"]);
    }

    #[test]
    fn tool_runs_in_work_dir() {
        let repo = project().stage(&["src/C.php"]);
        let fixer = fixer_path(&repo);
        let runner = ScriptedRunner::new().on(&fixer, &[], Outcome::ok(""));
        check(&runner, &repo, &StyleConfig::default(), &[]).unwrap();
        assert_eq!(runner.calls()[0].cwd.as_deref(), Some(repo.dir.path()));
    }

    #[test]
    fn scope_keeps_staged_order_when_config_untouched() {
        let registered: RegisteredFiles =
            ["a.php", "b.php"].into_iter().map(str::to_string).collect();
        let staged = vec!["b.php".to_string(), "x.txt".to_string()];
        assert_eq!(scope(&staged, &registered, ".php_cs.yml"), ["b.php", "x.txt"]);
    }
}
