//! Gate configuration (`.phpcq.yaml`).
//!
//! The file is optional and every key has a default, so a project without it
//! is checked with the classic PHP toolchain: `php -l`, PHP-CS-Fixer from
//! `vendor/bin` and the `composer.json` / `composer.lock` pair.
//!
//! ```yaml
//! syntax:
//!   command: ["php", "-l"]
//! style:
//!   config_file: .php_cs.yml
//!   command: ["vendor/bin/php-cs-fixer", "fix"]
//! lockfile:
//!   manifest: composer.json
//!   lockfile: composer.lock
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name looked up at the root of the checked tree.
pub const CONFIG_FILE_NAME: &str = ".phpcq.yaml";

/// Root of `.phpcq.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
    pub lockfile: LockfileConfig,
    pub syntax: SyntaxConfig,
    pub style: StyleConfig,
    pub vcs: VcsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LockfileConfig {
    /// Manifest hashed as opaque bytes.
    pub manifest: PathBuf,
    /// JSON lockfile carrying the recorded manifest hash.
    pub lockfile: PathBuf,
    /// Top-level lockfile key holding the hash.
    pub hash_field: String,
    /// Command the user is told to run when the pair is out of sync.
    pub update_hint: String,
}

impl Default for LockfileConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("composer.json"),
            lockfile: PathBuf::from("composer.lock"),
            hash_field: "hash".to_string(),
            update_hint: "composer update".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyntaxConfig {
    /// Program and leading arguments; the file path is appended.
    pub command: Vec<String>,
}

impl Default for SyntaxConfig {
    fn default() -> Self {
        Self {
            command: vec!["php".to_string(), "-l".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    /// Style-tool configuration, relative to the checked tree.
    pub config_file: PathBuf,
    /// Program and leading arguments; `<file> --dry-run --config-file=<config_file>`
    /// is appended.
    pub command: Vec<String>,
    /// Command the user is told to run to fix violations.
    pub fix_hint: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            config_file: PathBuf::from(".php_cs.yml"),
            command: vec![
                "vendor/bin/php-cs-fixer".to_string(),
                "fix".to_string(),
            ],
            fix_hint: "php vendor/bin/php-cs-fixer fix".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VcsConfig {
    /// Prefixes prepended to `git` / `hg` during discovery, in probe order.
    pub search_paths: Vec<String>,
}

impl Default for VcsConfig {
    fn default() -> Self {
        Self {
            search_paths: ["", "/usr/local/bin/", "/usr/bin/", "/bin/", "/sbin/"]
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

/// `<dir>/.phpcq.yaml`: pure, no I/O.
pub fn config_path_at(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE_NAME)
}

/// Load the gate configuration from `dir`.
///
/// Returns the defaults when the file does not exist.
pub fn load_at(dir: &Path) -> Result<GateConfig, ConfigError> {
    let path = config_path_at(dir);
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no gate configuration, using defaults");
            return Ok(GateConfig::default());
        }
        Err(source) => return Err(ConfigError::Io { path, source }),
    };
    parse(&path, &contents)
}

/// Parse `.phpcq.yaml` contents; `path` is used for error messages only.
pub fn parse(path: &Path, contents: &str) -> Result<GateConfig, ConfigError> {
    // An empty document deserializes as unit, not as an empty mapping.
    if contents.trim().is_empty() {
        return Ok(GateConfig::default());
    }
    let config: GateConfig =
        serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if config.syntax.command.is_empty() {
        return Err(ConfigError::EmptyCommand {
            path: path.to_path_buf(),
            key: "syntax.command",
        });
    }
    if config.style.command.is_empty() {
        return Err(ConfigError::EmptyCommand {
            path: path.to_path_buf(),
            key: "style.command",
        });
    }
    Ok(config)
}
