//! Built-in block kinds. Each module owns the syntax knowledge of one
//! construct: its factory, its parser, and the marker helpers both share.

pub mod block_quote;
pub mod code_fence;
pub mod heading;
pub mod html_block;
pub mod indented_code;
pub mod list;
pub mod paragraph;
pub mod thematic_break;

use crate::parsing::deps::FactoryId;

pub use block_quote::{BlockQuote, BlockQuoteFactory};
pub use code_fence::{CodeFence, FencedCodeFactory};
pub use heading::{Heading, HeadingFactory};
pub use html_block::HtmlBlockFactory;
pub use indented_code::IndentedCodeFactory;
pub use list::{ListFactory, ListMarkerParse};
pub use paragraph::{Paragraph, ParagraphParser};
pub use thematic_break::{ThematicBreak, ThematicBreakFactory};

/// Built-in factories in the order they are tried. Each one is declared to
/// run after all of its predecessors, so the chain survives any of them
/// being disabled.
pub const BUILTIN_ORDER: [FactoryId; 7] = [
    BlockQuoteFactory::ID,
    HeadingFactory::ID,
    FencedCodeFactory::ID,
    HtmlBlockFactory::ID,
    ThematicBreakFactory::ID,
    ListFactory::ID,
    IndentedCodeFactory::ID,
];
