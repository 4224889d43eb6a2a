//! # Inline Kinds
//!
//! Inline constructs built into the parser, each owning its syntax.
//!
//! ## Types
//!
//! - **`CodeSpan`**: backtick runs; a raw zone that suppresses other parsing
//! - **`LinkSyntax`**: labels, destinations and titles shared by inline
//!   links and reference definitions
//! - **`EmphasisDelimiterProcessor`**: `*` and `_` emphasis and strong emphasis
//!
//! The parser calls the constants and scanners here rather than hardcoding
//! delimiters.

pub mod code_span;
pub mod emphasis;
pub mod link;

pub use code_span::CodeSpan;
pub use emphasis::EmphasisDelimiterProcessor;
pub use link::{LinkSyntax, normalize_label, unescape};
