//! Parser options.
//!
//! Options are fixed once a [`Parser`](crate::Parser) is built. They
//! deserialize from the `[parser]` table of the mdweave config file, so
//! every field has a default and unknown extension keys are kept verbatim.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Number of columns of indentation that starts an indented code block.
pub const DEFAULT_CODE_BLOCK_INDENT: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Keep a `BlankLine` node for every blank source line.
    pub blank_lines_in_ast: bool,
    pub code_block_indent: usize,
    /// Recognise `[label]: destination "title"` at the start of paragraphs.
    pub reference_definitions: bool,
    pub blocks: BuiltinBlocks,
    /// Free-form settings read by extensions, e.g. `"wikilink.disabled"`.
    pub extensions: BTreeMap<String, OptionValue>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            blank_lines_in_ast: false,
            code_block_indent: DEFAULT_CODE_BLOCK_INDENT,
            reference_definitions: true,
            blocks: BuiltinBlocks::default(),
            extensions: BTreeMap::new(),
        }
    }
}

impl ParserOptions {
    /// Reads a boolean extension setting; missing or non-boolean is `false`.
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.extensions.get(key), Some(OptionValue::Bool(true)))
    }

    pub fn value(&self, key: &str) -> Option<&OptionValue> {
        self.extensions.get(key)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.extensions.insert(key.into(), value.into());
        self
    }
}

/// Switches for the built-in block constructs. Paragraphs are always on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuiltinBlocks {
    pub block_quote: bool,
    pub heading: bool,
    pub fenced_code: bool,
    pub html_block: bool,
    pub thematic_break: bool,
    pub list: bool,
    pub indented_code: bool,
}

impl Default for BuiltinBlocks {
    fn default() -> Self {
        Self {
            block_quote: true,
            heading: true,
            fenced_code: true,
            html_block: true,
            thematic_break: true,
            list: true,
            indented_code: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Int(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::Str(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        OptionValue::Str(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_is_false_unless_true_bool() {
        let opts = ParserOptions::default()
            .with("a", true)
            .with("b", "true")
            .with("c", false);
        assert!(opts.flag("a"));
        assert!(!opts.flag("b"));
        assert!(!opts.flag("c"));
        assert!(!opts.flag("missing"));
    }

    #[test]
    fn defaults_enable_every_builtin() {
        let opts = ParserOptions::default();
        assert_eq!(opts.code_block_indent, 4);
        assert!(opts.blocks.list && opts.blocks.fenced_code);
        assert!(opts.reference_definitions);
    }
}
