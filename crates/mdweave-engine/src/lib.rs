pub mod error;
pub mod ext;
pub mod options;
pub mod parsing;

// Re-export key types for easier usage
pub use error::{ConfigError, ParseError};
pub use options::{BuiltinBlocks, OptionValue, ParserOptions};
pub use parsing::{
    Document, DocumentHook, Extension, Parser, ParserBuilder, node::NodeKind, parse_document,
    tree::{NodeId, Tree},
};
