//! Lossless PHP tokenizer.
//!
//! Only the distinctions the fixers need are made: whitespace, comments and
//! everything else. Concatenating every token's content reproduces the input
//! byte for byte.
//!
//! Inline HTML outside `<?php ... ?>`, string literals and heredoc/nowdoc
//! bodies are opaque `Other` tokens, so whitespace inside them is never
//! touched.

use std::fmt;

/// What a token is, as far as whitespace fixing is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Whitespace,
    Comment,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub content: String,
}

impl Token {
    pub fn new(kind: TokenKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind == TokenKind::Whitespace
    }

    pub fn is_comment(&self) -> bool {
        self.kind == TokenKind::Comment
    }
}

/// An ordered token stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens(Vec<Token>);

impl Tokens {
    pub fn from_code(code: &str) -> Self {
        Lexer::new(code).run()
    }

    /// Reassemble source text from the tokens.
    pub fn generate_code(&self) -> String {
        self.0.iter().map(|t| t.content.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Token> {
        self.0.iter_mut()
    }
}

impl<'a> IntoIterator for &'a Tokens {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Tokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.0 {
            f.write_str(&token.content)?;
        }
        Ok(())
    }
}

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    out: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            out: Vec::new(),
        }
    }

    fn run(mut self) -> Tokens {
        while self.pos < self.bytes.len() {
            self.inline_html();
            self.php();
        }
        Tokens(self.out)
    }

    fn push(&mut self, kind: TokenKind, end: usize) {
        if end > self.pos {
            self.out.push(Token::new(kind, &self.src[self.pos..end]));
            self.pos = end;
        }
    }

    fn rest(&self) -> &'a [u8] {
        let bytes = self.bytes;
        &bytes[self.pos..]
    }

    /// Text up to the next open tag, then the open tag itself. `<?` not
    /// followed by `php` or `=` stays inline HTML.
    fn inline_html(&mut self) {
        let bytes = self.bytes;
        let mut from = self.pos;
        loop {
            let Some(offset) = find(&bytes[from..], b"<?") else {
                self.push(TokenKind::Other, bytes.len());
                return;
            };
            let tag = from + offset;
            let after = &bytes[tag + 2..];
            let end = if after.len() >= 3 && after[..3].eq_ignore_ascii_case(b"php") {
                let end = tag + 5;
                // The long open tag swallows one following newline or blank.
                end + newline_len(&bytes[end..])
                    .or_else(|| matches!(bytes.get(end), Some(b' ' | b'\t')).then_some(1))
                    .unwrap_or(0)
            } else if after.first() == Some(&b'=') {
                tag + 3
            } else {
                from = tag + 2;
                continue;
            };
            self.push(TokenKind::Other, tag);
            self.push(TokenKind::Other, end);
            return;
        }
    }

    /// PHP code up to and including the close tag, or to the end of input.
    fn php(&mut self) {
        while self.pos < self.bytes.len() {
            let rest = self.rest();
            let (kind, end) = match rest[0] {
                b'?' if rest.get(1) == Some(&b'>') => {
                    let end = self.pos + 2;
                    let end = end + newline_len(&self.bytes[end..]).unwrap_or(0);
                    self.push(TokenKind::Other, end);
                    return;
                }
                b' ' | b'\t' | b'\n' | b'\r' => {
                    let len = rest
                        .iter()
                        .take_while(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
                        .count();
                    (TokenKind::Whitespace, self.pos + len)
                }
                b'#' if rest.get(1) != Some(&b'[') => (TokenKind::Comment, self.line_comment()),
                b'/' if rest.get(1) == Some(&b'/') => (TokenKind::Comment, self.line_comment()),
                b'/' if rest.get(1) == Some(&b'*') => {
                    let end = find(&rest[2..], b"*/").map_or(self.bytes.len(), |i| self.pos + i + 4);
                    (TokenKind::Comment, end)
                }
                b'\'' | b'"' | b'`' => (TokenKind::Other, self.quoted(rest[0])),
                b'<' if rest.starts_with(b"<<<") => (TokenKind::Other, self.heredoc()),
                b if is_word_byte(b) => (
                    TokenKind::Other,
                    self.pos + rest.iter().take_while(|b| is_word_byte(**b)).count(),
                ),
                _ => (TokenKind::Other, self.pos + 1),
            };
            self.push(kind, end);
        }
    }

    /// End of a `//` or `#` comment: the line end or a close tag, whichever
    /// comes first. The line break is not part of the comment.
    fn line_comment(&self) -> usize {
        let rest = self.rest();
        let mut i = 0;
        while i < rest.len() {
            match rest[i] {
                b'\n' | b'\r' => break,
                b'?' if rest.get(i + 1) == Some(&b'>') => break,
                _ => i += 1,
            }
        }
        self.pos + i
    }

    /// End of a quoted literal, honouring backslash escapes.
    fn quoted(&self, quote: u8) -> usize {
        let rest = self.rest();
        let mut i = 1;
        while i < rest.len() {
            match rest[i] {
                b'\\' => i += 2,
                b if b == quote => return self.pos + i + 1,
                _ => i += 1,
            }
        }
        self.bytes.len()
    }

    /// End of a heredoc or nowdoc, including the closing identifier. The
    /// closing identifier may be indented.
    fn heredoc(&self) -> usize {
        let rest = self.rest();
        let mut i = 3;
        while matches!(rest.get(i), Some(b' ' | b'\t')) {
            i += 1;
        }
        if matches!(rest.get(i), Some(b'\'' | b'"')) {
            i += 1;
        }
        let label_start = i;
        while rest.get(i).is_some_and(|b| is_word_byte(*b) && *b != b'$' && *b != b'\\') {
            i += 1;
        }
        let label = &rest[label_start..i];
        if label.is_empty() {
            // `<<<` without a label is just an operator sequence.
            return self.pos + 3;
        }
        if matches!(rest.get(i), Some(b'\'' | b'"')) {
            i += 1;
        }
        match newline_len(&rest[i..]) {
            Some(len) => i += len,
            None => return self.pos + i,
        }

        while i < rest.len() {
            let line_start = i;
            let mut j = i;
            while matches!(rest.get(j), Some(b' ' | b'\t')) {
                j += 1;
            }
            if rest[j..].starts_with(label)
                && !rest
                    .get(j + label.len())
                    .is_some_and(|b| is_word_byte(*b) && *b != b'$' && *b != b'\\')
            {
                return self.pos + j + label.len();
            }
            i = line_start;
            while i < rest.len() && rest[i] != b'\n' {
                i += 1;
            }
            i += 1;
        }
        self.bytes.len()
    }
}

/// Identifier, variable, number and namespace characters. Non-ASCII bytes
/// count as identifier bytes, which keeps every split on a char boundary.
fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'\\') || b >= 0x80
}

fn newline_len(bytes: &[u8]) -> Option<usize> {
    match bytes {
        [b'\r', b'\n', ..] => Some(2),
        [b'\n', ..] | [b'\r', ..] => Some(1),
        _ => None,
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn kinds(code: &str) -> Vec<(TokenKind, String)> {
        Tokens::from_code(code)
            .iter()
            .map(|t| (t.kind, t.content.clone()))
            .collect()
    }

    #[rstest]
    #[case("")]
    #[case("<html>\n  <body>\n")]
    #[case("<?php\n\nnamespace App;\n\nclass A\n{\n    public $x = 'a\\'b';\n}\n")]
    #[case("<p>\n  <?= $title ?>\n</p>\n<?php\n    echo 1;\n")]
    #[case("<?php\n$s = <<<EOT\n    keep    me\n    EOT;\n$n = <<<'RAW'\n  x\nRAW;\n")]
    #[case("<?php\n/**\n     * Doc\n     */\n# hash\n#[Attr]\nfunction f() {} // tail\n")]
    #[case("<?php\n$a = \"unterminated")]
    #[case("<?php\n/* unterminated")]
    #[case("<?php\r\n\r\n    $crlf = 1;\r\n")]
    #[case("<?php\n$ü = 'ünïcödé';  // ☃\n")]
    fn round_trip_is_lossless(#[case] code: &str) {
        assert_eq!(Tokens::from_code(code).generate_code(), code);
    }

    #[test]
    fn classifies_whitespace_and_comments() {
        let tokens = kinds("<?php\n    // note\n    $a = 1; # tail\n/* b */\n");
        assert_eq!(
            tokens,
            [
                (TokenKind::Other, "<?php\n".to_string()),
                (TokenKind::Whitespace, "    ".to_string()),
                (TokenKind::Comment, "// note".to_string()),
                (TokenKind::Whitespace, "\n    ".to_string()),
                (TokenKind::Other, "$a".to_string()),
                (TokenKind::Whitespace, " ".to_string()),
                (TokenKind::Other, "=".to_string()),
                (TokenKind::Whitespace, " ".to_string()),
                (TokenKind::Other, "1".to_string()),
                (TokenKind::Other, ";".to_string()),
                (TokenKind::Whitespace, " ".to_string()),
                (TokenKind::Comment, "# tail".to_string()),
                (TokenKind::Whitespace, "\n".to_string()),
                (TokenKind::Comment, "/* b */".to_string()),
                (TokenKind::Whitespace, "\n".to_string()),
            ]
        );
    }

    #[test]
    fn inline_html_is_opaque() {
        let tokens = kinds("<div>\n    text\n</div>\n");
        assert_eq!(tokens, [(TokenKind::Other, "<div>\n    text\n</div>\n".to_string())]);
    }

    #[test]
    fn close_tag_returns_to_html() {
        let tokens = kinds("<?php echo 1 ?>\n    <b>\n");
        let last = tokens.last().unwrap();
        assert_eq!(*last, (TokenKind::Other, "    <b>\n".to_string()));
    }

    #[test]
    fn line_comment_stops_at_close_tag() {
        let tokens = kinds("<?php // c ?>x");
        assert!(tokens.contains(&(TokenKind::Comment, "// c ".to_string())));
        assert!(tokens.contains(&(TokenKind::Other, "?>".to_string())));
    }

    #[test]
    fn heredoc_body_is_one_token() {
        let code = "<?php\n$s = <<<\"EOT\"\n        body\n    EOT;\n";
        let tokens = kinds(code);
        assert!(tokens.contains(&(
            TokenKind::Other,
            "<<<\"EOT\"\n        body\n    EOT".to_string()
        )));
    }

    #[test]
    fn strings_are_single_tokens() {
        let tokens = kinds("<?php $a = \"x    \\\"y\";");
        assert!(tokens.contains(&(TokenKind::Other, "\"x    \\\"y\"".to_string())));
    }

    #[test]
    fn attribute_hash_is_not_a_comment() {
        let tokens = kinds("<?php\n#[Route]\n");
        assert!(tokens.iter().all(|(kind, _)| *kind != TokenKind::Comment));
    }
}
