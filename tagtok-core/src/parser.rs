//! The tag parser: a single-pass, recursive-descent grammar over a token
//! stream.
//!
//! The driver loop pulls tokens from a [`TokenStream`]; a `Text` token is
//! emitted directly, a `<` hands off to the tag grammar, which hands off
//! to the attribute grammar per attribute and finally emits one [`Tag`]
//! event covering the whole `<...>` span. Tags the handler does not care
//! about are scanned to the closing `>` and re-emitted wholesale as one
//! [`Text`] event, with no attribute parsing.
//!
//! Error policy is all-or-nothing: the first unrecoverable grammar
//! violation reports its location through the handler's `error` callback
//! and unwinds the whole pass. Events emitted before the failure stand.

use std::borrow::Cow;
use std::fmt;

use crate::event::{Attribute, Tag, TagKind, Text, TokenHandler};
use crate::lexer::Lexer;
use crate::span::{Location, Span};
use crate::token::{SourceError, TokenKind, TokenSource, TokenStream};

/// Codes for fatal parse conditions.
///
/// Using an enum instead of String keeps the error path allocation-free
/// and lets consumers distinguish the taxonomy without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ParseErrorCode {
    /// Token source called again after end of input
    SourceExhausted = 0,
    /// Token source produced something it could not classify
    SourceInvalid,
    /// Driver loop saw a token other than text or `<`
    UnexpectedToken,
    /// Input ended inside a tag
    UnexpectedEof,
    /// No name where a tag name was required
    UnrecognizedTag,
    /// Unusable token where an attribute name was required
    IllegalAttributeName,
    /// Unusable token after `=`
    IllegalAttributeValue,
    /// No `>` where the tag had to end
    ExpectedTagEnd,
    /// Pushback invoked while the slot was occupied - a parser bug,
    /// not bad input
    PushbackOccupied,
}

impl ParseErrorCode {
    /// Get a human-readable message for this error code.
    pub fn message(self) -> &'static str {
        match self {
            Self::SourceExhausted => "token source exhausted",
            Self::SourceInvalid => "invalid token from source",
            Self::UnexpectedToken => "expected text or start of tag",
            Self::UnexpectedEof => "unexpected end of input inside tag",
            Self::UnrecognizedTag => "could not recognise tag",
            Self::IllegalAttributeName => "illegal attribute name",
            Self::IllegalAttributeValue => "illegal attribute value",
            Self::ExpectedTagEnd => "expected end of tag",
            Self::PushbackOccupied => "cannot push back more than once",
        }
    }
}

impl From<SourceError> for ParseErrorCode {
    fn from(error: SourceError) -> Self {
        match error {
            SourceError::Exhausted => Self::SourceExhausted,
            SourceError::Invalid => Self::SourceInvalid,
        }
    }
}

/// A fatal parse failure with its source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    pub code: ParseErrorCode,
    pub location: Location,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at line {}, column {}",
            self.code.message(),
            self.location.line,
            self.location.column
        )
    }
}

impl std::error::Error for ParseError {}

/// Single-pass tag/text event parser.
///
/// One instance per input buffer and handler. [`run`](Self::run) consumes
/// the parser, so a finished (or failed) pass cannot be restarted.
pub struct TagParser<'a, S, H> {
    input: &'a str,
    stream: TokenStream<'a, S>,
    handler: H,
    /// Attributes of the tag currently being parsed; cleared after each
    /// Tag event. The views handed to the handler borrow this storage.
    attributes: Vec<Attribute<'a>>,
    /// Scratch for reassembling fragmented unquoted attribute values.
    attribute_buffer: String,
}

impl<'a, H: TokenHandler> TagParser<'a, Lexer<'a>, H> {
    /// Parser over `input` using the built-in [`Lexer`].
    pub fn new(input: &'a str, handler: H) -> Self {
        Self::with_source(input, Lexer::new(input), handler)
    }
}

impl<'a, S: TokenSource<'a>, H: TokenHandler> TagParser<'a, S, H> {
    /// Parser over `input` pulling tokens from an external source.
    ///
    /// The source must produce spans and text that refer to `input`.
    pub fn with_source(input: &'a str, source: S, handler: H) -> Self {
        Self {
            input,
            stream: TokenStream::new(source),
            handler,
            attributes: Vec::new(),
            attribute_buffer: String::with_capacity(64),
        }
    }

    /// Run the pass to end of input or the first fatal error.
    ///
    /// On failure the handler's `error` callback has already fired once,
    /// with the same code and location as the returned [`ParseError`].
    pub fn run(mut self) -> Result<(), ParseError> {
        match self.drive() {
            Ok(()) => Ok(()),
            Err(code) => {
                let location = self.stream.location();
                log::debug!(
                    target: "tagtok.parser",
                    "fatal: {} at {}:{}",
                    code.message(),
                    location.line,
                    location.column
                );
                self.handler.error(code, location);
                Err(ParseError { code, location })
            }
        }
    }

    fn drive(&mut self) -> Result<(), ParseErrorCode> {
        loop {
            match self.stream.take_next()? {
                TokenKind::Eof => return Ok(()),
                TokenKind::Text => {
                    let span = self.stream.current_span();
                    self.emit_text(span);
                }
                TokenKind::Lt => self.parse_tag()?,
                _ => return Err(ParseErrorCode::UnexpectedToken),
            }
        }
    }

    fn emit_text(&mut self, span: Span) {
        let view = Text::new(span.slice(self.input), span);
        self.handler.text(&view);
    }

    /// Tag grammar, entered with `<` as the current token.
    fn parse_tag(&mut self) -> Result<(), ParseErrorCode> {
        let start = self.stream.current_span().start;
        self.stream.skip_whitespace()?;

        let mut token = self.stream.take_next()?;
        let mut kind = TagKind::Open;
        if token == TokenKind::Slash {
            // closing tag; the name must follow
            kind = TagKind::Close;
            token = self.stream.take_next()?;
        }

        match token {
            TokenKind::Word => {
                let name = self.stream.current_text();
                if self.handler.cares_about_tag(name) {
                    self.parse_full_tag(kind, name, start)
                } else {
                    self.skip_opaque_tag(start)
                }
            }
            // <> or < > - ignored, no event
            TokenKind::Gt => Ok(()),
            TokenKind::Eof => Err(ParseErrorCode::UnexpectedEof),
            _ => Err(ParseErrorCode::UnrecognizedTag),
        }
    }

    /// Scan an un-cared-for tag to its `>` and re-emit the whole span,
    /// delimiters included, as one Text event.
    fn skip_opaque_tag(&mut self, start: u32) -> Result<(), ParseErrorCode> {
        loop {
            match self.stream.take_next()? {
                TokenKind::Gt => {
                    let end = self.stream.current_span().end;
                    self.emit_text(Span::new(start, end));
                    return Ok(());
                }
                TokenKind::Eof => return Err(ParseErrorCode::UnexpectedEof),
                _ => {}
            }
        }
    }

    /// Attribute loop and tag terminator for a cared-about tag.
    fn parse_full_tag(
        &mut self,
        mut kind: TagKind,
        name: &'a str,
        start: u32,
    ) -> Result<(), ParseErrorCode> {
        loop {
            self.stream.skip_whitespace()?;
            let token = self.stream.take_next()?;
            self.stream.push_back(token)?;
            match token {
                // no more attributes
                TokenKind::Slash | TokenKind::Gt => break,
                TokenKind::Word => self.parse_attribute()?,
                TokenKind::Eof => return Err(ParseErrorCode::UnexpectedEof),
                _ => return Err(ParseErrorCode::IllegalAttributeName),
            }
        }

        let mut token = self.stream.take_next()?;
        if token == TokenKind::Slash {
            // trailing slash marks an empty tag; a tag already marked
            // Close is never promoted
            if kind != TagKind::Close {
                kind = TagKind::Empty;
            }
            token = self.stream.take_next()?;
        }

        if token != TokenKind::Gt {
            return Err(ParseErrorCode::ExpectedTagEnd);
        }

        let span = Span::new(start, self.stream.current_span().end);
        log::trace!(
            target: "tagtok.parser",
            "tag {:?} <{}> with {} attribute(s)",
            kind,
            name,
            self.attributes.len()
        );
        let view = Tag::new(kind, name, span.slice(self.input), span, &self.attributes);
        self.handler.tag(&view);
        self.attributes.clear();
        Ok(())
    }

    /// One attribute: `name`, optionally `= value` where the value is a
    /// quoted literal or a run of unquoted fragments.
    fn parse_attribute(&mut self) -> Result<(), ParseErrorCode> {
        self.stream.take_next()?; // the Word the caller peeked
        let name = self.stream.current_text();
        self.stream.skip_whitespace()?;

        let token = self.stream.take_next()?;
        match token {
            TokenKind::Equals => {
                self.stream.skip_whitespace()?;
                match self.stream.take_next()? {
                    TokenKind::Quoted => {
                        let quoted = self.stream.current_text();
                        let value = quoted
                            .get(1..quoted.len().saturating_sub(1))
                            .unwrap_or("");
                        self.attributes.push(Attribute {
                            name,
                            value: Some(Cow::Borrowed(value)),
                        });
                        Ok(())
                    }
                    TokenKind::Word | TokenKind::Slash => self.parse_unquoted_value(name),
                    // `=` directly against the tag terminator: the
                    // attribute has no value at all and is dropped;
                    // the terminator goes back for the attribute loop
                    TokenKind::Gt => self.stream.push_back(TokenKind::Gt),
                    _ => Err(ParseErrorCode::IllegalAttributeValue),
                }
            }
            // valueless HTML-style attribute; the follower is the next
            // attribute or the tag terminator
            TokenKind::Slash | TokenKind::Gt | TokenKind::Word => {
                self.attributes.push(Attribute { name, value: None });
                self.stream.push_back(token)
            }
            _ => Err(ParseErrorCode::IllegalAttributeName),
        }
    }

    /// Reassemble an unquoted value that the scanner fragmented: adjacent
    /// `Word`/`Equals`/`Slash` tokens concatenate until anything else
    /// (whitespace, `>`) terminates the run.
    fn parse_unquoted_value(&mut self, name: &'a str) -> Result<(), ParseErrorCode> {
        self.attribute_buffer.clear();
        self.attribute_buffer.push_str(self.stream.current_text());
        loop {
            let next = self.stream.take_next()?;
            match next {
                TokenKind::Word | TokenKind::Equals | TokenKind::Slash => {
                    self.attribute_buffer.push_str(self.stream.current_text());
                }
                _ => {
                    self.stream.push_back(next)?;
                    break;
                }
            }
        }
        self.attributes.push(Attribute {
            name,
            value: Some(Cow::Owned(self.attribute_buffer.clone())),
        });
        Ok(())
    }
}
