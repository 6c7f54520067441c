//! Space indentation: tabs in indentation become four spaces.

use std::path::Path;

use crate::fixers::lines_inclusive;
use crate::pipeline::Fixer;
use crate::tokens::Tokens;

pub struct IndentationFixer;

impl IndentationFixer {
    /// Expand tabs in whitespace tokens and in the indentation of comment
    /// lines.
    pub fn apply(tokens: &mut Tokens) {
        for token in tokens.iter_mut() {
            if token.is_whitespace() {
                token.content = expand_tabs(&token.content);
            } else if token.is_comment() {
                token.content = lines_inclusive(&token.content)
                    .map(|line| {
                        let indent = line.len() - line.trim_start_matches([' ', '\t']).len();
                        let (lead, tail) = line.split_at(indent);
                        expand_tabs(lead) + tail
                    })
                    .collect();
            }
        }
    }
}

impl Fixer for IndentationFixer {
    fn name(&self) -> &'static str {
        "indentation"
    }

    fn description(&self) -> &'static str {
        "Code must use four spaces for indenting, not tabs."
    }

    fn priority(&self) -> i32 {
        50
    }

    fn fix(&self, _path: &Path, content: &str) -> String {
        let mut tokens = Tokens::from_code(content);
        Self::apply(&mut tokens);
        tokens.generate_code()
    }
}

/// Replace each tab with four spaces. One to three spaces directly before a
/// tab are part of that tab stop and are absorbed.
fn expand_tabs(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut spaces = 0;
    for c in s.chars() {
        match c {
            '\t' => {
                if (1..=3).contains(&spaces) {
                    out.truncate(out.len() - spaces);
                }
                out.push_str("    ");
                spaces = 0;
            }
            ' ' => {
                out.push(' ');
                spaces += 1;
            }
            _ => {
                out.push(c);
                spaces = 0;
            }
        }
    }
    out
}
