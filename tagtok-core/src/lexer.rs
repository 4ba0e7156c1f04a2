//! Default buffer-backed token source.
//!
//! A two-mode scanner over an in-memory `&str`. Outside tags, everything
//! up to the next `<` is a single `Text` token (found with `memchr`).
//! Inside a tag, characters classify into the tag-syntax kinds: words,
//! whitespace runs, `=`, `/`, quoted literals, and the closing `>` which
//! flips back to text mode.
//!
//! All token boundaries land on ASCII delimiter characters, so spans are
//! always valid `char` boundaries even in multibyte input.

use memchr::memchr;

use crate::span::{Location, Span};
use crate::token::{SourceError, TokenKind, TokenSource};

/// Characters that terminate a `Word` inside a tag.
#[inline]
fn is_word_boundary(byte: u8) -> bool {
    matches!(
        byte,
        b' ' | b'\t' | b'\r' | b'\n' | b'=' | b'/' | b'<' | b'>' | b'"' | b'\''
    )
}

/// Buffer-backed [`TokenSource`] over `&str` input.
#[derive(Debug)]
pub struct Lexer<'a> {
    input: &'a str,
    /// Offset of the next unread byte
    pos: usize,
    /// Offset where the current token started
    token_start: usize,
    /// Line/column of the current token's first character
    token_location: Location,
    /// Line/column of the next unread character
    line: u32,
    column: u32,
    /// Whether we are between `<` and `>`
    in_tag: bool,
    /// Set once `Eof` has been yielded
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Create a lexer over an input buffer.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            token_start: 0,
            token_location: Location::start(),
            line: 1,
            column: 1,
            in_tag: false,
            finished: false,
        }
    }

    /// Advance to `end`, updating line/column per character consumed.
    fn advance_to(&mut self, end: usize) {
        for ch in self.input[self.pos..end].chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos = end;
    }

    /// Scan one token starting at `self.pos` (not at end of input).
    fn scan(&mut self) -> TokenKind {
        let bytes = self.input.as_bytes();

        if !self.in_tag {
            if bytes[self.pos] == b'<' {
                self.advance_to(self.pos + 1);
                self.in_tag = true;
                return TokenKind::Lt;
            }
            let end = memchr(b'<', &bytes[self.pos..])
                .map(|found| self.pos + found)
                .unwrap_or(bytes.len());
            self.advance_to(end);
            return TokenKind::Text;
        }

        match bytes[self.pos] {
            b'>' => {
                self.advance_to(self.pos + 1);
                self.in_tag = false;
                TokenKind::Gt
            }
            b'<' => {
                self.advance_to(self.pos + 1);
                TokenKind::Lt
            }
            b'=' => {
                self.advance_to(self.pos + 1);
                TokenKind::Equals
            }
            b'/' => {
                self.advance_to(self.pos + 1);
                TokenKind::Slash
            }
            b' ' | b'\t' | b'\r' | b'\n' => {
                let mut end = self.pos + 1;
                while end < bytes.len() && bytes[end].is_ascii_whitespace() {
                    end += 1;
                }
                self.advance_to(end);
                TokenKind::Whitespace
            }
            quote @ (b'"' | b'\'') => {
                match memchr(quote, &bytes[self.pos + 1..]) {
                    Some(found) => {
                        // both delimiters included in the token
                        self.advance_to(self.pos + 1 + found + 1);
                        TokenKind::Quoted
                    }
                    None => {
                        // unterminated - a lone quote character
                        self.advance_to(self.pos + 1);
                        TokenKind::Quote
                    }
                }
            }
            _ => {
                let mut end = self.pos + 1;
                while end < bytes.len() && !is_word_boundary(bytes[end]) {
                    end += 1;
                }
                self.advance_to(end);
                TokenKind::Word
            }
        }
    }
}

impl<'a> TokenSource<'a> for Lexer<'a> {
    fn next_token(&mut self) -> Result<TokenKind, SourceError> {
        if self.pos >= self.input.len() {
            if self.finished {
                return Err(SourceError::Exhausted);
            }
            self.finished = true;
            self.token_start = self.pos;
            self.token_location = Location::new(self.line, self.column);
            return Ok(TokenKind::Eof);
        }
        self.token_start = self.pos;
        self.token_location = Location::new(self.line, self.column);
        let kind = self.scan();
        log::trace!(
            target: "tagtok.lexer",
            "token {:?} at {}..{}",
            kind,
            self.token_start,
            self.pos
        );
        Ok(kind)
    }

    fn current_text(&self) -> &'a str {
        &self.input[self.token_start..self.pos]
    }

    fn current_span(&self) -> Span {
        Span::new(self.token_start as u32, self.pos as u32)
    }

    fn location(&self) -> Location {
        self.token_location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Collect (kind, text) pairs up to and including Eof.
    fn lex(input: &str) -> Vec<(TokenKind, &str)> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        loop {
            let kind = lexer.next_token().expect("lexed past end");
            tokens.push((kind, lexer.current_text()));
            if kind == TokenKind::Eof {
                return tokens;
            }
        }
    }

    #[test]
    fn test_text_and_simple_tag() {
        use TokenKind::*;
        assert_eq!(
            lex("hi<p>there"),
            vec![
                (Text, "hi"),
                (Lt, "<"),
                (Word, "p"),
                (Gt, ">"),
                (Text, "there"),
                (Eof, ""),
            ]
        );
    }

    #[test]
    fn test_tag_internals() {
        use TokenKind::*;
        assert_eq!(
            lex("<a href=\"x y\" checked/>"),
            vec![
                (Lt, "<"),
                (Word, "a"),
                (Whitespace, " "),
                (Word, "href"),
                (Equals, "="),
                (Quoted, "\"x y\""),
                (Whitespace, " "),
                (Word, "checked"),
                (Slash, "/"),
                (Gt, ">"),
                (Eof, ""),
            ]
        );
    }

    #[test]
    fn test_word_fragmented_by_slash_and_equals() {
        use TokenKind::*;
        assert_eq!(
            lex("<x a=b/c>"),
            vec![
                (Lt, "<"),
                (Word, "x"),
                (Whitespace, " "),
                (Word, "a"),
                (Equals, "="),
                (Word, "b"),
                (Slash, "/"),
                (Word, "c"),
                (Gt, ">"),
                (Eof, ""),
            ]
        );
    }

    #[test]
    fn test_single_quoted_literal() {
        let tokens = lex("<x a='v'>");
        assert!(tokens.contains(&(TokenKind::Quoted, "'v'")));
    }

    #[test]
    fn test_unterminated_quote_is_a_bare_quote_token() {
        use TokenKind::*;
        assert_eq!(
            lex("<x a=\">"),
            vec![
                (Lt, "<"),
                (Word, "x"),
                (Whitespace, " "),
                (Word, "a"),
                (Equals, "="),
                (Quote, "\""),
                (Gt, ">"),
                (Eof, ""),
            ]
        );
    }

    #[test]
    fn test_gt_leaves_tag_mode() {
        use TokenKind::*;
        assert_eq!(
            lex("<b>=/</b>"),
            vec![
                (Lt, "<"),
                (Word, "b"),
                (Gt, ">"),
                (Text, "=/"),
                (Lt, "<"),
                (Slash, "/"),
                (Word, "b"),
                (Gt, ">"),
                (Eof, ""),
            ]
        );
    }

    #[test]
    fn test_multibyte_text_and_words() {
        use TokenKind::*;
        assert_eq!(
            lex("héllo<täg ü=béta>"),
            vec![
                (Text, "héllo"),
                (Lt, "<"),
                (Word, "täg"),
                (Whitespace, " "),
                (Word, "ü"),
                (Equals, "="),
                (Word, "béta"),
                (Gt, ">"),
                (Eof, ""),
            ]
        );
    }

    #[test]
    fn test_spans_are_contiguous() {
        let input = "a<b c=\"d\">e";
        let mut lexer = Lexer::new(input);
        let mut expected_start = 0;
        loop {
            let kind = lexer.next_token().unwrap();
            let span = lexer.current_span();
            assert_eq!(span.start, expected_start);
            expected_start = span.end;
            if kind == TokenKind::Eof {
                break;
            }
        }
        assert_eq!(expected_start as usize, input.len());
    }

    #[test]
    fn test_location_tracking() {
        let mut lexer = Lexer::new("ab\ncd<p>");
        lexer.next_token().unwrap(); // Text "ab\ncd"
        assert_eq!(lexer.location(), Location::new(1, 1));
        lexer.next_token().unwrap(); // Lt
        assert_eq!(lexer.location(), Location::new(2, 3));
        lexer.next_token().unwrap(); // Word "p"
        assert_eq!(lexer.location(), Location::new(2, 4));
    }

    #[test]
    fn test_exhaustion_after_eof() {
        let mut lexer = Lexer::new("");
        assert_eq!(lexer.next_token(), Ok(TokenKind::Eof));
        assert_eq!(lexer.next_token(), Err(SourceError::Exhausted));
    }
}
