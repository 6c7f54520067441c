//! Checklist-style report on stdout.
//!
//! ```text
//! PHP Code Quality:
//! Composer sync check... ✓
//! Syntax check... Syntax errors in files:
//!     ✘ src/Broken.php
//! To inspect the problems use:
//!     $ php -l src/Broken.php
//! Coding style check... ✓
//! ```

use std::io::{self, Write};

use colored::Colorize;
use phpcq_core::CheckResult;

pub struct Printer<W: Write> {
    out: W,
}

impl<W: Write> Printer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn header(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", "PHP Code Quality:".bold())
    }

    /// Label, then the success glyph or the error caption and one line per
    /// failing entry.
    pub fn result(&mut self, result: &CheckResult) -> io::Result<()> {
        write!(self.out, "{}", result.category.label())?;
        if result.is_pass() {
            return writeln!(self.out, "{}", "✓".green());
        }
        writeln!(self.out, "{}", result.category.error_caption().red())?;
        for failure in &result.failures {
            writeln!(self.out, "    {}", format!("✘ {failure}").red())?;
        }
        Ok(())
    }

    /// How to re-run the syntax checker on each failing file.
    pub fn syntax_hint(&mut self, command: &[String], files: &[String]) -> io::Result<()> {
        writeln!(self.out, "To inspect the problems use:")?;
        for file in files {
            let line = format!("$ {}", shell_words::join(command.iter().chain([file])));
            writeln!(self.out, "    {}", line.green())?;
        }
        Ok(())
    }

    pub fn style_hint(&mut self, fix_hint: &str) -> io::Result<()> {
        writeln!(self.out, "To fix the problems use:")?;
        writeln!(self.out, "    {}", format!("$ {fix_hint}").green())
    }

    /// A fatal precondition, printed as a sentence in red.
    pub fn fatal(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{}", sentence(message).red())
    }

    pub fn blank_line(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }
}

fn sentence(message: &str) -> String {
    let mut chars = message.chars();
    let mut text: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    if !text.ends_with('.') {
        text.push('.');
    }
    text
}
