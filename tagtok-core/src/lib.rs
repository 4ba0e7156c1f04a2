//! tagtok Core Parser
//!
//! Streaming, event-based tag tokenizer for markup text. Splits an input
//! buffer into runs of plain text and tag occurrences (open/close/empty)
//! with their attributes, and pushes them at a [`TokenHandler`] without
//! building a tree. Tags the handler declines interest in are re-emitted
//! wholesale as text, which is what makes the model useful for content
//! transformation: untouched markup flows through byte-identical.
//!
//! # Architecture
//!
//! - **token.rs** - token kinds, the `TokenSource` interface, pushback stream adapter
//! - **lexer.rs** - default buffer-backed token source
//! - **event.rs** - `Text`/`Tag` event views and the `TokenHandler` trait
//! - **parser.rs** - recursive-descent tag/attribute grammar
//! - **span.rs** - Span/Location types
//!
//! # Example
//!
//! ```
//! use tagtok_core::{Location, ParseErrorCode, Tag, TagParser, Text, TokenHandler};
//!
//! struct Collect(Vec<String>);
//!
//! impl TokenHandler for Collect {
//!     fn cares_about_tag(&mut self, name: &str) -> bool {
//!         name.eq_ignore_ascii_case("title")
//!     }
//!     fn text(&mut self, text: &Text<'_>) {
//!         self.0.push(format!("text: {}", text.as_str()));
//!     }
//!     fn tag(&mut self, tag: &Tag<'_>) {
//!         self.0.push(format!("tag: {}", tag.name()));
//!     }
//!     fn error(&mut self, code: ParseErrorCode, location: Location) {
//!         self.0.push(format!("error: {} at {:?}", code.message(), location));
//!     }
//! }
//!
//! let mut events = Collect(Vec::new());
//! TagParser::new("<title>Hi</title><p>body</p>", &mut events)
//!     .run()
//!     .unwrap();
//! assert_eq!(
//!     events.0,
//!     ["tag: title", "text: Hi", "tag: title", "text: <p>", "text: body", "text: </p>"]
//! );
//! ```

pub mod event;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;

pub use event::{Attribute, Tag, TagKind, Text, TokenHandler};
pub use lexer::Lexer;
pub use parser::{ParseError, ParseErrorCode, TagParser};
pub use span::{Location, Span};
pub use token::{SourceError, TokenKind, TokenSource, TokenStream};
