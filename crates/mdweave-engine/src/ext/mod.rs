//! # Extensions
//!
//! Optional syntaxes built on the public extension points. Each one is an
//! [`Extension`](crate::parsing::Extension) applied with
//! [`ParserBuilder::with_extension`](crate::parsing::ParserBuilder::with_extension):
//!
//! - **`aside`**: `| text`, a container block started by a block parser
//!   factory
//! - **`strikethrough`**: `~~text~~`, a delimiter processor
//! - **`superscript`**: `x^2^`, a delimiter processor
//! - **`wikilink`**: `[[target]]` and `[[target|alias]]`, an inline parser
//!   extension

pub mod aside;
pub mod strikethrough;
pub mod superscript;
pub mod wikilink;

pub use aside::{Aside, AsideExtension, AsideFactory};
pub use strikethrough::{StrikethroughDelimiterProcessor, StrikethroughExtension};
pub use superscript::{SuperscriptDelimiterProcessor, SuperscriptExtension};
pub use wikilink::{WikiLink, WikiLinkExtension, WikiLinkParser};
