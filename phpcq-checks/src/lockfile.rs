//! Lockfile sync check.
//!
//! Composer records the MD5 of `composer.json` in `composer.lock` under
//! `hash`. When both files are tracked, the manifest in the working directory
//! is hashed and compared against that field; any disagreement yields exactly
//! one error entry for the whole project. If either file is untracked there
//! is nothing to compare and the check passes.

use std::path::Path;

use md5::{Digest, Md5};

use phpcq_core::config::LockfileConfig;
use phpcq_core::{CheckCategory, CheckResult};
use phpcq_vcs::Repository;

use crate::error::{io_err, CheckError};

/// Run the lockfile sync check.
pub fn check(repo: &dyn Repository, config: &LockfileConfig) -> Result<CheckResult, CheckError> {
    let manifest = slash_path(&config.manifest);
    let lockfile = slash_path(&config.lockfile);

    if !repo.is_tracked(&manifest)? || !repo.is_tracked(&lockfile)? {
        tracing::debug!(%manifest, %lockfile, "lockfile pair not tracked, skipping");
        return Ok(CheckResult::pass(CheckCategory::Composer));
    }

    let manifest_path = repo.work_dir().join(&config.manifest);
    let lockfile_path = repo.work_dir().join(&config.lockfile);
    let manifest_bytes =
        std::fs::read(&manifest_path).map_err(|e| io_err(&manifest_path, e))?;
    let lock_text =
        std::fs::read_to_string(&lockfile_path).map_err(|e| io_err(&lockfile_path, e))?;

    let expected = manifest_hash(&manifest_bytes);
    let recorded = recorded_hash(&lock_text, &config.hash_field);
    tracing::debug!(%expected, ?recorded, "compared lockfile hash");

    if recorded.as_deref() == Some(expected.as_str()) {
        return Ok(CheckResult::pass(CheckCategory::Composer));
    }

    Ok(CheckResult::new(
        CheckCategory::Composer,
        vec![format!(
            "Files '{manifest}' and '{lockfile}' are not in sync. Please run '{}'.",
            config.update_hint
        )],
    ))
}

/// Lowercase hex MD5 of the manifest bytes.
pub fn manifest_hash(bytes: &[u8]) -> String {
    hex::encode(Md5::digest(bytes))
}

/// The string stored under `field` in a JSON lockfile.
///
/// `None` when the lockfile is not a JSON object or the field is missing or
/// not a string; the caller treats that as out of sync.
pub fn recorded_hash(lock_text: &str, field: &str) -> Option<String> {
    let json: serde_json::Value = match serde_json::from_str(lock_text) {
        Ok(json) => json,
        Err(err) => {
            tracing::warn!(error = %err, "lockfile is not valid JSON");
            return None;
        }
    };
    json.get(field).and_then(|v| v.as_str()).map(str::to_string)
}

fn slash_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeRepo;

    const MANIFEST: &str = "{\n    \"require\": {\"php\": \">=8.1\"}\n}\n";

    fn lock_with(hash: &str) -> String {
        format!("{{\"hash\": \"{hash}\", \"packages\": []}}")
    }

    #[test]
    fn md5_of_known_input() {
        assert_eq!(manifest_hash(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(manifest_hash(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn matching_hash_passes() {
        let hash = manifest_hash(MANIFEST.as_bytes());
        let repo = FakeRepo::new()
            .file("composer.json", MANIFEST)
            .file("composer.lock", &lock_with(&hash));
        let result = check(&repo, &LockfileConfig::default()).unwrap();
        assert!(result.is_pass());
    }

    #[test]
    fn mismatch_yields_exactly_one_error_naming_both_files() {
        let repo = FakeRepo::new()
            .file("composer.json", MANIFEST)
            .file("composer.lock", &lock_with("0123456789abcdef0123456789abcdef"));
        let result = check(&repo, &LockfileConfig::default()).unwrap();
        assert_eq!(result.category, CheckCategory::Composer);
        assert_eq!(result.failures.len(), 1);
        let message = &result.failures[0];
        assert!(message.contains("'composer.json'"), "got: {message}");
        assert!(message.contains("'composer.lock'"), "got: {message}");
        assert!(message.contains("composer update"), "got: {message}");
    }

    #[test]
    fn untracked_lockfile_passes_despite_mismatch() {
        let repo = FakeRepo::new()
            .file("composer.json", MANIFEST)
            .untracked("composer.lock", &lock_with("stale"));
        assert!(check(&repo, &LockfileConfig::default()).unwrap().is_pass());
    }

    #[test]
    fn untracked_manifest_passes_despite_mismatch() {
        let repo = FakeRepo::new()
            .untracked("composer.json", MANIFEST)
            .file("composer.lock", &lock_with("stale"));
        assert!(check(&repo, &LockfileConfig::default()).unwrap().is_pass());
    }

    #[test]
    fn malformed_lockfile_is_out_of_sync() {
        let repo = FakeRepo::new()
            .file("composer.json", MANIFEST)
            .file("composer.lock", "{ not json");
        let result = check(&repo, &LockfileConfig::default()).unwrap();
        assert_eq!(result.failures.len(), 1);
    }

    #[test]
    fn configured_field_and_paths_are_used() {
        let manifest = "name = \"demo\"\n";
        let hash = manifest_hash(manifest.as_bytes());
        let repo = FakeRepo::new()
            .file("deps/manifest.toml", manifest)
            .file("deps/manifest.lock", &format!("{{\"digest\": \"{hash}\"}}"));
        let config = LockfileConfig {
            manifest: "deps/manifest.toml".into(),
            lockfile: "deps/manifest.lock".into(),
            hash_field: "digest".to_string(),
            update_hint: "tool lock".to_string(),
        };
        assert!(check(&repo, &config).unwrap().is_pass());
    }

    #[test]
    fn recorded_hash_requires_string_field() {
        assert_eq!(recorded_hash(r#"{"hash": 5}"#, "hash"), None);
        assert_eq!(recorded_hash(r#"[]"#, "hash"), None);
        assert_eq!(
            recorded_hash(r#"{"hash": "abc"}"#, "hash").as_deref(),
            Some("abc")
        );
    }
}
