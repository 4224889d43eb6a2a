//! # Inline Parsing
//!
//! Cursor-based inline parsing over the joined content lines of a block.
//!
//! ## Architecture
//!
//! Inline parsing runs after the block tree is final. Each block whose kind
//! carries inline content (paragraphs, headings, opted-in extension blocks)
//! has its content lines joined with `\n`; offsets in the joined text map
//! back to source offsets so every inline node keeps an exact span.
//!
//! The scan is a single left-to-right pass:
//! - Code spans are raw zones that suppress all other parsing inside them
//! - Inline extensions get first claim on their trigger character
//! - Delimiter runs and `[` become text nodes and are paired afterwards
//!
//! ## Modules
//!
//! - **`cursor`**: `Cursor` for char-by-char scanning with position tracking
//! - **`delimiters`**: `DelimiterProcessor` trait and flanking classification
//! - **`kinds`**: built-in constructs (code spans, links, emphasis)
//! - **`types`**: `InlineParserExtension` and its context/match types
//! - **`parser`**: the scan, link resolution and delimiter pairing

pub mod cursor;
pub mod delimiters;
pub mod kinds;
pub(crate) mod parser;
pub mod types;

pub use delimiters::{DelimiterMatch, DelimiterProcessor, DelimiterRun, RunFlags};
pub use types::{InlineContext, InlineMatch, InlineParserExtension};
