//! Domain types shared by the checks and the report printer.
//!
//! A check never grades severity: a file either fails a category or it does
//! not, so a result is just the ordered list of failing entries.

use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// The three check categories, in the order they run and are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckCategory {
    Composer,
    Syntax,
    Style,
}

impl CheckCategory {
    pub fn all() -> &'static [CheckCategory] {
        &[
            CheckCategory::Composer,
            CheckCategory::Syntax,
            CheckCategory::Style,
        ]
    }

    /// Label printed before the pass/fail marker.
    pub fn label(self) -> &'static str {
        match self {
            CheckCategory::Composer => "Composer sync check... ",
            CheckCategory::Syntax => "Syntax check... ",
            CheckCategory::Style => "Coding style check... ",
        }
    }

    /// Caption printed when the category has failures.
    pub fn error_caption(self) -> &'static str {
        match self {
            CheckCategory::Composer => "Errors:",
            CheckCategory::Syntax => "Syntax errors in files:",
            CheckCategory::Style => "Coding style violations in files:",
        }
    }
}

impl fmt::Display for CheckCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckCategory::Composer => write!(f, "composer"),
            CheckCategory::Syntax => write!(f, "syntax"),
            CheckCategory::Style => write!(f, "style"),
        }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Failing entries of one category. Empty means pass.
///
/// For the syntax and style categories each entry is a path relative to the
/// checked tree; the composer category carries a single human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub category: CheckCategory,
    pub failures: Vec<String>,
}

impl CheckResult {
    pub fn new(category: CheckCategory, failures: Vec<String>) -> Self {
        Self { category, failures }
    }

    pub fn pass(category: CheckCategory) -> Self {
        Self::new(category, Vec::new())
    }

    pub fn is_pass(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.failures.iter().any(|f| f == entry)
    }
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub results: Vec<CheckResult>,
}

impl Report {
    pub fn push(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    pub fn get(&self, category: CheckCategory) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.category == category)
    }

    /// `true` when no recorded category has a failure.
    pub fn is_success(&self) -> bool {
        self.results.iter().all(CheckResult::is_pass)
    }

    /// Process exit code for this report: 0 on success, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}
