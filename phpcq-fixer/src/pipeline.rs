//! The fixer plugin trait and the pipeline that runs fixers by priority.

use std::path::Path;

use crate::error::{io_err, FixerError};
use crate::fixers::{EofEndingFixer, IndentWithTabsFixer, IndentationFixer};

/// A source transformation over one PHP file.
pub trait Fixer {
    /// Identifier as used in tool configuration, e.g. `indent_with_tabs`.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Higher runs earlier.
    fn priority(&self) -> i32 {
        0
    }

    /// Whether this fixer applies to `path`. Defaults to PHP sources.
    fn supports(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == "php")
    }

    fn fix(&self, path: &Path, content: &str) -> String;
}

/// Fixers ordered by descending priority. Fixers with equal priority keep
/// their registration order.
#[derive(Default)]
pub struct FixerPipeline {
    fixers: Vec<Box<dyn Fixer>>,
}

impl FixerPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indentation normalization, tab indentation, then the final newline.
    pub fn indent_with_tabs() -> Self {
        Self::new()
            .with(IndentWithTabsFixer)
            .with(EofEndingFixer)
            .with(IndentationFixer)
    }

    pub fn with(mut self, fixer: impl Fixer + 'static) -> Self {
        self.fixers.push(Box::new(fixer));
        self.fixers.sort_by_key(|f| std::cmp::Reverse(f.priority()));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.fixers.iter().map(|f| f.name()).collect()
    }

    /// Run every supporting fixer over `content` in priority order.
    pub fn fix(&self, path: &Path, content: &str) -> String {
        self.run(path, content, |f| f.supports(path))
    }

    /// Run every fixer over `content`, including those that would not claim
    /// `path` by its name.
    pub fn force_fix(&self, path: &Path, content: &str) -> String {
        self.run(path, content, |_| true)
    }

    /// Fix one file in place with the fixers that support it. Returns whether
    /// the content changed; with `dry_run` nothing is written.
    pub fn fix_file(&self, path: &Path, dry_run: bool) -> Result<bool, FixerError> {
        self.rewrite(path, dry_run, Self::fix)
    }

    /// Like [`FixerPipeline::fix_file`] but with [`FixerPipeline::force_fix`],
    /// for files the user named explicitly.
    pub fn force_fix_file(&self, path: &Path, dry_run: bool) -> Result<bool, FixerError> {
        self.rewrite(path, dry_run, Self::force_fix)
    }

    fn run(&self, path: &Path, content: &str, applies: impl Fn(&dyn Fixer) -> bool) -> String {
        let mut current = content.to_string();
        for fixer in &self.fixers {
            if !applies(fixer.as_ref()) {
                continue;
            }
            let next = fixer.fix(path, &current);
            if next != current {
                tracing::debug!(fixer = fixer.name(), path = %path.display(), "fixer changed content");
            }
            current = next;
        }
        current
    }

    fn rewrite(
        &self,
        path: &Path,
        dry_run: bool,
        fix: fn(&Self, &Path, &str) -> String,
    ) -> Result<bool, FixerError> {
        let original = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        let fixed = fix(self, path, &original);
        if fixed == original {
            return Ok(false);
        }
        if !dry_run {
            std::fs::write(path, fixed).map_err(|e| io_err(path, e))?;
        }
        Ok(true)
    }
}
