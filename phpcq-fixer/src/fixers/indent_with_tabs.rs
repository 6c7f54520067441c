//! Tab indentation.
//!
//! Indentation is first normalized to spaces, then every leading run of four
//! or more spaces in whitespace and comment tokens has each group of four
//! replaced by a tab. Spaces left over stay as spaces. Spaces after code on
//! the same line are never touched, nor is anything inside strings, heredocs
//! or inline HTML.

use std::path::Path;

use crate::fixers::{lines_inclusive, IndentationFixer};
use crate::pipeline::Fixer;
use crate::tokens::Tokens;

pub struct IndentWithTabsFixer;

impl Fixer for IndentWithTabsFixer {
    fn name(&self) -> &'static str {
        "indent_with_tabs"
    }

    fn description(&self) -> &'static str {
        "Code must use tabs for indenting."
    }

    fn priority(&self) -> i32 {
        -49
    }

    fn fix(&self, _path: &Path, content: &str) -> String {
        let mut tokens = Tokens::from_code(content);
        IndentationFixer::apply(&mut tokens);

        let mut at_line_start = true;
        for token in tokens.iter_mut() {
            let ends_line = token.content.ends_with(['\n', '\r']);
            if token.is_whitespace() || token.is_comment() {
                token.content = tabify(&token.content, at_line_start);
            }
            at_line_start = ends_line;
        }
        tokens.generate_code()
    }
}

/// Convert leading space runs per line. The first line only counts as
/// leading when the token starts a line.
fn tabify(content: &str, at_line_start: bool) -> String {
    let mut out = String::with_capacity(content.len());
    for (i, line) in lines_inclusive(content).enumerate() {
        let spaces = line.bytes().take_while(|b| *b == b' ').count();
        if (i == 0 && !at_line_start) || spaces < 4 {
            out.push_str(line);
            continue;
        }
        out.extend(std::iter::repeat('\t').take(spaces / 4));
        out.push_str(&line[spaces - spaces % 4..]);
    }
    out
}
