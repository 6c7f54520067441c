//! The built-in fixers.

mod eof_ending;
mod indent_with_tabs;
mod indentation;

pub use eof_ending::EofEndingFixer;
pub use indent_with_tabs::IndentWithTabsFixer;
pub use indentation::IndentationFixer;

/// Lines of `text` with their line break attached. `\r\n`, `\n` and a lone
/// `\r` all end a line; the pieces concatenate back to `text`.
pub(crate) fn lines_inclusive(text: &str) -> impl Iterator<Item = &str> + '_ {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let end = match rest.find(['\n', '\r']) {
            Some(i) if rest[i..].starts_with("\r\n") => i + 2,
            Some(i) => i + 1,
            None => rest.len(),
        };
        let (line, tail) = rest.split_at(end);
        rest = tail;
        Some(line)
    })
}
