use std::path::Path;

use crate::pipeline::Fixer;

/// A non-empty file ends with exactly one line ending.
pub struct EofEndingFixer;

impl Fixer for EofEndingFixer {
    fn name(&self) -> &'static str {
        "eof_ending"
    }

    fn description(&self) -> &'static str {
        "A file must always end with a single empty line feed."
    }

    fn priority(&self) -> i32 {
        -50
    }

    fn fix(&self, _path: &Path, content: &str) -> String {
        if content.is_empty() {
            return String::new();
        }
        let ending = match content.find('\n') {
            Some(i) if content[..i].ends_with('\r') => "\r\n",
            _ => "\n",
        };
        format!("{}{ending}", content.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "")]
    #[case("<?php", "<?php\n")]
    #[case("<?php\n\n\n", "<?php\n")]
    #[case("<?php\necho 1;  \n \n", "<?php\necho 1;\n")]
    #[case("<?php\r\necho 1;", "<?php\r\necho 1;\r\n")]
    fn single_trailing_newline(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(EofEndingFixer.fix(Path::new("a.php"), input), expected);
    }
}
