//! Parser events - the output of the tag tokenizer.
//!
//! This is a SAX-style callback model: the parser pushes [`Text`] and
//! [`Tag`] views at a [`TokenHandler`] as it recognizes them, with no
//! accumulation and no tree.
//!
//! Both views are zero-copy references into the original input buffer,
//! valid only for the duration of the callback that receives them. A
//! consumer that needs an event beyond its callback must copy the text
//! out; the parser reuses its internal storage between callbacks.

use std::borrow::Cow;

use crate::parser::ParseErrorCode;
use crate::span::{Location, Span};

/// How a tag occurrence is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `<name ...>`
    Open,
    /// `</name ...>`
    Close,
    /// `<name .../>`
    Empty,
}

/// One parsed attribute, in source order.
///
/// The name is stored verbatim (lookup compares case-insensitively).
/// The value is `None` for valueless HTML-boolean-style attributes;
/// quoted values have already had their delimiters stripped. Values
/// reassembled from fragmented unquoted tokens are owned, everything
/// else borrows the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute<'a> {
    pub name: &'a str,
    pub value: Option<Cow<'a, str>>,
}

/// A run of plain content: either document text between tags, or the
/// whole span of a tag the consumer declined interest in.
#[derive(Debug, Clone, Copy)]
pub struct Text<'a> {
    raw: &'a str,
    span: Span,
}

impl<'a> Text<'a> {
    pub(crate) fn new(raw: &'a str, span: Span) -> Self {
        Self { raw, span }
    }

    /// The text itself, as a slice of the original input.
    #[inline]
    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    /// Byte span within the original input.
    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }

    /// Append this run to an output buffer without intermediate copies.
    pub fn write_to(&self, out: &mut String) {
        out.push_str(self.raw);
    }
}

/// A fully parsed tag occurrence the consumer cares about.
#[derive(Debug, Clone, Copy)]
pub struct Tag<'a> {
    kind: TagKind,
    name: &'a str,
    raw: &'a str,
    span: Span,
    attributes: &'a [Attribute<'a>],
}

impl<'a> Tag<'a> {
    pub(crate) fn new(
        kind: TagKind,
        name: &'a str,
        raw: &'a str,
        span: Span,
        attributes: &'a [Attribute<'a>],
    ) -> Self {
        Self {
            kind,
            name,
            raw,
            span,
            attributes,
        }
    }

    /// Open, Close, or Empty.
    #[inline]
    pub fn kind(&self) -> TagKind {
        self.kind
    }

    /// The tag name, verbatim.
    #[inline]
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The whole `<...>` occurrence, delimiters included.
    #[inline]
    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    /// Byte span of the whole occurrence within the original input.
    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }

    /// Attributes in source order.
    #[inline]
    pub fn attributes(&self) -> &'a [Attribute<'a>] {
        self.attributes
    }

    /// Number of attributes.
    #[inline]
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Name of the attribute at `index`, or `None` if out of range.
    pub fn attribute_name(&self, index: usize) -> Option<&str> {
        self.attributes.get(index).map(|attr| attr.name)
    }

    /// Value of the attribute at `index`. `None` for both an out-of-range
    /// index and a present-but-valueless attribute.
    pub fn attribute_value(&self, index: usize) -> Option<&str> {
        self.attributes.get(index).and_then(|attr| attr.value.as_deref())
    }

    /// Look up an attribute value by name, ASCII-case-insensitively.
    /// First match wins. `None` when the attribute is absent or valueless.
    pub fn attribute_value_named(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
            .and_then(|attr| attr.value.as_deref())
    }

    /// True iff [`attribute_value_named`](Self::attribute_value_named)
    /// finds a present value. A valueless attribute therefore reads as
    /// absent here - a quirk kept for compatibility with historical
    /// behavior.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute_value_named(name).is_some()
    }

    /// Append the whole occurrence to an output buffer.
    pub fn write_to(&self, out: &mut String) {
        out.push_str(self.raw);
    }
}

/// The event consumer.
///
/// One handler receives every event of a pass, in source order. The
/// `error` callback fires at most once, immediately before the pass
/// unwinds.
pub trait TokenHandler {
    /// Queried once per tag occurrence, before any attribute parsing.
    /// Returning `false` makes the parser re-emit the whole `<...>` span
    /// as one [`Text`] event instead.
    fn cares_about_tag(&mut self, name: &str) -> bool;

    /// A run of plain text (including opaque un-cared-for tag spans).
    fn text(&mut self, text: &Text<'_>);

    /// A fully parsed, cared-about tag.
    fn tag(&mut self, tag: &Tag<'_>);

    /// A fatal condition. The pass aborts right after this returns;
    /// events emitted before the failure point stand.
    fn error(&mut self, code: ParseErrorCode, location: Location);
}

impl<H: TokenHandler + ?Sized> TokenHandler for &mut H {
    fn cares_about_tag(&mut self, name: &str) -> bool {
        (**self).cares_about_tag(name)
    }

    fn text(&mut self, text: &Text<'_>) {
        (**self).text(text)
    }

    fn tag(&mut self, tag: &Tag<'_>) {
        (**self).tag(tag)
    }

    fn error(&mut self, code: ParseErrorCode, location: Location) {
        (**self).error(code, location)
    }
}
