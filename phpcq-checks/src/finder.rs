//! Style-tool file selection.
//!
//! The style tool's configuration is YAML. Only its `finder` section is read
//! here; everything else belongs to the tool. The rules follow the default
//! PHP-CS-Fixer finder: `*.php` files under the project, skipping dot files,
//! VCS metadata and `vendor/`.
//!
//! ```yaml
//! finder:
//!   in: [src, tests]
//!   name: ["*.php"]
//!   not_name: ["*.blade.php"]
//!   exclude: [fixtures]
//! rules: { ... }   # passed through to the tool untouched
//! ```

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use walkdir::{DirEntry, WalkDir};

use crate::error::{io_err, CheckError};

/// Directory names skipped when `ignore_vcs` is set.
const VCS_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "CVS",
    "_darcs",
    ".bzr",
    ".arch-params",
    ".monotone",
];

/// The part of the style-tool configuration the gate understands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StyleToolConfig {
    pub finder: FinderRules,
}

/// File-selection rules, all paths relative to the checked tree.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FinderRules {
    #[serde(rename = "in")]
    pub in_dirs: Vec<PathBuf>,
    pub name: Vec<String>,
    pub not_name: Vec<String>,
    pub exclude: Vec<PathBuf>,
    pub path: Vec<String>,
    pub not_path: Vec<String>,
    pub ignore_dot_files: bool,
    pub ignore_vcs: bool,
    pub files: Vec<String>,
}

impl Default for FinderRules {
    fn default() -> Self {
        Self {
            in_dirs: vec![PathBuf::from(".")],
            name: vec!["*.php".to_string()],
            not_name: Vec::new(),
            exclude: vec![PathBuf::from("vendor")],
            path: Vec::new(),
            not_path: Vec::new(),
            ignore_dot_files: true,
            ignore_vcs: true,
            files: Vec::new(),
        }
    }
}

/// Sorted set of `/`-separated paths the style tool is configured to scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisteredFiles(BTreeSet<String>);

impl RegisteredFiles {
    pub fn contains(&self, path: &str) -> bool {
        self.0.contains(path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

impl FromIterator<String> for RegisteredFiles {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Load the style-tool configuration at `path`.
///
/// An empty file means default finder rules.
pub fn load(path: &Path) -> Result<StyleToolConfig, CheckError> {
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    if contents.trim().is_empty() {
        return Ok(StyleToolConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|source| CheckError::StyleConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

impl FinderRules {
    /// Resolve the rules into concrete files under `base`.
    pub fn resolve(&self, base: &Path) -> Result<RegisteredFiles, CheckError> {
        let names = compile(&self.name, true)?;
        let not_names = compile(&self.not_name, true)?;
        let paths = compile(&self.path, false)?;
        let not_paths = compile(&self.not_path, false)?;

        let mut found = BTreeSet::new();
        for dir in &self.in_dirs {
            let root = if dir.as_os_str() == "." {
                base.to_path_buf()
            } else {
                base.join(dir)
            };
            if !root.is_dir() {
                return Err(CheckError::FinderDirMissing { path: root });
            }

            let walker = WalkDir::new(&root)
                .min_depth(1)
                .into_iter()
                .filter_entry(|entry| self.keep_entry(entry, &root));
            for entry in walker {
                let entry = entry?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let Ok(rel_to_in) = entry.path().strip_prefix(&root) else {
                    continue;
                };
                let file_name = entry.file_name();
                if !self.name.is_empty() && !names.is_match(file_name) {
                    continue;
                }
                if not_names.is_match(file_name) {
                    continue;
                }
                if !self.path.is_empty() && !paths.is_match(rel_to_in) {
                    continue;
                }
                if not_paths.is_match(rel_to_in) {
                    continue;
                }
                if let Ok(rel) = entry.path().strip_prefix(base) {
                    found.insert(to_slash(rel));
                }
            }
        }

        for file in &self.files {
            if base.join(file).is_file() {
                found.insert(file.trim_start_matches("./").to_string());
            }
        }

        tracing::debug!(count = found.len(), base = %base.display(), "resolved finder rules");
        Ok(RegisteredFiles(found))
    }

    fn keep_entry(&self, entry: &DirEntry, root: &Path) -> bool {
        let name = entry.file_name().to_string_lossy();
        if self.ignore_vcs && entry.file_type().is_dir() && VCS_DIRS.iter().any(|vcs| name == *vcs) {
            return false;
        }
        if self.ignore_dot_files && name.starts_with('.') {
            return false;
        }
        if entry.file_type().is_dir() {
            if let Ok(rel) = entry.path().strip_prefix(root) {
                if self.exclude.iter().any(|ex| normalized(ex) == normalized(rel)) {
                    return false;
                }
            }
        }
        true
    }
}

fn compile(patterns: &[String], literal_separator: bool) -> Result<GlobSet, CheckError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(literal_separator)
            .build()
            .map_err(|source| CheckError::Glob {
                pattern: pattern.clone(),
                source,
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| CheckError::Glob {
        pattern: patterns.join(", "),
        source,
    })
}

fn normalized(path: &Path) -> Vec<Component<'_>> {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Join path components with `/` regardless of platform.
pub(crate) fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
