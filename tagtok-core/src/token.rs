//! Token kinds, the token source interface, and the pushback stream adapter.
//!
//! The grammar never touches a scanner directly: it pulls from a
//! [`TokenStream`], which wraps any [`TokenSource`] and adds exactly one
//! token of pushback. That single slot is the only lookahead the tag and
//! attribute grammars ever need.

use crate::parser::ParseErrorCode;
use crate::span::{Location, Span};

/// Lexical token kinds produced by a [`TokenSource`].
///
/// This enumeration is closed: the grammar never synthesizes new kinds,
/// and a source must not invent its own. Numeric identity of the variants
/// is an implementation detail, not part of the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `/` inside a tag
    Slash,
    /// A run of whitespace inside a tag
    Whitespace,
    /// `=` inside a tag
    Equals,
    /// A lone quote character (unterminated quoted literal)
    Quote,
    /// A bare word inside a tag (tag name, attribute name, unquoted value)
    Word,
    /// A run of plain content outside any tag
    Text,
    /// A quoted literal inside a tag, delimiters included
    Quoted,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// End of input, yielded exactly once
    Eof,
}

/// Failure from a [`TokenSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceError {
    /// `next_token` called again after `Eof` was already yielded
    Exhausted,
    /// The source produced something it cannot classify
    Invalid,
}

/// The external scanner interface.
///
/// The lifetime `'a` is the input buffer: `current_text` returns slices
/// of the original input, valid for the whole pass, so callers may hold
/// them across further `next_token` calls.
pub trait TokenSource<'a> {
    /// Advance to the next token. Yields [`TokenKind::Eof`] exactly once
    /// at end of input; any call after that is [`SourceError::Exhausted`].
    fn next_token(&mut self) -> Result<TokenKind, SourceError>;

    /// Raw text of the most recently yielded token.
    fn current_text(&self) -> &'a str;

    /// Byte span of the most recently yielded token.
    fn current_span(&self) -> Span;

    /// Line/column of the most recently yielded token.
    fn location(&self) -> Location;
}

/// The buffered token: kind plus the text/span it matched.
///
/// One record, one `Option` - the "at most one token of pushback"
/// invariant is structural rather than checked.
#[derive(Debug, Clone, Copy)]
struct Pushback<'a> {
    kind: TokenKind,
    text: &'a str,
    span: Span,
}

/// Pull adapter over a [`TokenSource`] with single-slot pushback.
#[derive(Debug)]
pub struct TokenStream<'a, S> {
    source: S,
    pushback: Option<Pushback<'a>>,
    /// Text of the most recently taken token
    text: &'a str,
    /// Span of the most recently taken token
    span: Span,
}

impl<'a, S: TokenSource<'a>> TokenStream<'a, S> {
    /// Wrap a token source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            pushback: None,
            text: "",
            span: Span::new(0, 0),
        }
    }

    /// Take the next token: the pushed-back one if the slot is occupied,
    /// otherwise a fresh token from the source.
    pub fn take_next(&mut self) -> Result<TokenKind, ParseErrorCode> {
        if let Some(pushback) = self.pushback.take() {
            self.text = pushback.text;
            self.span = pushback.span;
            return Ok(pushback.kind);
        }
        let kind = self.source.next_token()?;
        self.text = self.source.current_text();
        self.span = self.source.current_span();
        Ok(kind)
    }

    /// Buffer the most recently taken token for redelivery.
    ///
    /// Fails with [`ParseErrorCode::PushbackOccupied`] if a token is
    /// already buffered - that is a bug in the grammar, not bad input.
    pub fn push_back(&mut self, kind: TokenKind) -> Result<(), ParseErrorCode> {
        if self.pushback.is_some() {
            return Err(ParseErrorCode::PushbackOccupied);
        }
        self.pushback = Some(Pushback {
            kind,
            text: self.text,
            span: self.span,
        });
        Ok(())
    }

    /// Discard whitespace tokens, pushing back the first non-whitespace
    /// token found. At most one token is buffered afterwards.
    pub fn skip_whitespace(&mut self) -> Result<(), ParseErrorCode> {
        loop {
            let next = self.take_next()?;
            if next != TokenKind::Whitespace {
                self.push_back(next)?;
                return Ok(());
            }
        }
    }

    /// Raw text of the most recently taken token.
    #[inline]
    pub fn current_text(&self) -> &'a str {
        self.text
    }

    /// Span of the most recently taken token.
    #[inline]
    pub fn current_span(&self) -> Span {
        self.span
    }

    /// Current source position, for error reporting.
    #[inline]
    pub fn location(&self) -> Location {
        self.source.location()
    }
}
