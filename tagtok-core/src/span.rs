//! Source positions: byte-offset spans and line/column locations.
//!
//! These types are stable and hand-written. Offsets are `u32` - a single
//! parse pass covers one in-memory buffer, never more than 4 GiB.

/// A byte range into the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Start offset (inclusive)
    pub start: u32,
    /// End offset (exclusive)
    pub end: u32,
}

impl Span {
    /// Create a new span.
    #[inline]
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Length of the span in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        (self.end - self.start) as usize
    }

    /// Check if the span is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Resolve this span against the buffer it was produced from.
    #[inline]
    pub fn slice<'a>(&self, input: &'a str) -> &'a str {
        &input[self.start as usize..self.end as usize]
    }
}

/// A 1-based line/column position, used for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    /// Create a new location.
    #[inline]
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// The start of a buffer: line 1, column 1.
    #[inline]
    pub fn start() -> Self {
        Self { line: 1, column: 1 }
    }
}
