//! Types at the seam between the block engine and block parsers.
//!
//! A [`BlockParserFactory`] looks at the current line and may start one or
//! more blocks, each driven by a [`BlockParser`] that decides line by line
//! whether its block continues.

use std::collections::HashMap;

use crate::options::ParserOptions;
use crate::parsing::deps::Dependent;
use crate::parsing::node::NodeKind;
use crate::parsing::rope::Span;
use crate::parsing::tree::{NodeId, Tree};

use super::content::BlockLine;
use super::cursor::LineCursor;

/// Outcome of asking an open block whether it continues on this line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockContinue {
    /// The block does not continue.
    None,
    /// Continues; the cursor stays where it is.
    Continue,
    /// Continues after moving the cursor to a byte index.
    AtIndex(usize),
    /// Continues after moving the cursor to a visual column.
    AtColumn(usize),
    /// Continues, consumes the whole line and closes.
    Finalize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reposition {
    Index(usize),
    Column(usize),
}

/// One block opened by a successful [`BlockStart`].
pub struct StartedBlock {
    pub kind: NodeKind,
    pub parser: Box<dyn BlockParser>,
    /// Lines carried over into the block, e.g. a paragraph turned heading.
    pub lines: Vec<BlockLine>,
    /// Source offset the block starts at; defaults to the next non-space
    /// character of the line.
    pub start: Option<usize>,
}

impl StartedBlock {
    pub fn new(kind: NodeKind, parser: impl BlockParser + 'static) -> Self {
        Self {
            kind,
            parser: Box::new(parser),
            lines: Vec::new(),
            start: None,
        }
    }

    pub fn with_lines(mut self, lines: Vec<BlockLine>) -> Self {
        self.lines = lines;
        self
    }

    pub fn starting_at(mut self, offset: usize) -> Self {
        self.start = Some(offset);
        self
    }
}

/// A factory's answer when it recognises the start of a block.
pub struct BlockStart {
    /// Blocks to open, outermost first.
    pub blocks: Vec<StartedBlock>,
    pub reposition: Option<Reposition>,
    /// The new block takes over the matched paragraph, which is discarded.
    pub replace_active: bool,
}

impl BlockStart {
    pub fn of(block: StartedBlock) -> Self {
        Self {
            blocks: vec![block],
            reposition: None,
            replace_active: false,
        }
    }

    pub fn nested(blocks: Vec<StartedBlock>) -> Self {
        Self {
            blocks,
            reposition: None,
            replace_active: false,
        }
    }

    pub fn at_index(mut self, index: usize) -> Self {
        self.reposition = Some(Reposition::Index(index));
        self
    }

    pub fn at_column(mut self, column: usize) -> Self {
        self.reposition = Some(Reposition::Column(column));
        self
    }

    pub fn replacing_active(mut self) -> Self {
        self.replace_active = true;
        self
    }
}

/// Read-only view of the line being processed.
pub struct ParserState<'a> {
    cursor: &'a LineCursor<'a>,
    tree: &'a Tree,
    options: &'a ParserOptions,
    line_number: usize,
    last_line_blank: &'a HashMap<NodeId, bool>,
}

impl<'a> ParserState<'a> {
    pub(crate) fn new(
        cursor: &'a LineCursor<'a>,
        tree: &'a Tree,
        options: &'a ParserOptions,
        line_number: usize,
        last_line_blank: &'a HashMap<NodeId, bool>,
    ) -> Self {
        Self {
            cursor,
            tree,
            options,
            line_number,
            last_line_blank,
        }
    }

    /// The line without its terminator. Indices below refer into it.
    pub fn line(&self) -> &'a str {
        self.cursor.text()
    }

    /// Absolute source offset of the line's first byte.
    pub fn line_start(&self) -> usize {
        self.cursor.line_start()
    }

    /// Absolute span of the full line, terminator included.
    pub fn line_span(&self) -> Span {
        self.cursor.line().span
    }

    /// Zero-based line number.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn index(&self) -> usize {
        self.cursor.index()
    }

    pub fn column(&self) -> usize {
        self.cursor.column()
    }

    pub fn next_non_space(&self) -> usize {
        self.cursor.next_non_space()
    }

    pub fn next_non_space_column(&self) -> usize {
        self.cursor.next_non_space_column()
    }

    pub fn indent(&self) -> usize {
        self.cursor.indent()
    }

    pub fn is_blank(&self) -> bool {
        self.cursor.is_blank()
    }

    pub fn byte_at(&self, index: usize) -> Option<u8> {
        self.cursor.byte_at(index)
    }

    /// The line from the next non-space character on.
    pub fn rest(&self) -> &'a str {
        &self.cursor.text()[self.cursor.next_non_space()..]
    }

    /// Below this indent a line may start non-code blocks.
    pub fn code_block_indent(&self) -> usize {
        self.options.code_block_indent
    }

    pub fn options(&self) -> &'a ParserOptions {
        self.options
    }

    pub fn tree(&self) -> &'a Tree {
        self.tree
    }

    pub fn is_last_line_blank(&self, node: NodeId) -> bool {
        self.last_line_blank.get(&node).copied().unwrap_or(false)
    }
}

/// The deepest open block that continued on the current line.
pub struct MatchedBlock<'a> {
    pub(crate) node: NodeId,
    pub(crate) tree: &'a Tree,
}

impl<'a> MatchedBlock<'a> {
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn kind(&self) -> &'a NodeKind {
        self.tree.kind(self.node)
    }

    pub fn span(&self) -> Span {
        self.tree.span(self.node)
    }

    /// The collected lines, if the matched block is paragraph-like.
    pub fn paragraph_lines(&self) -> Option<&'a [BlockLine]> {
        self.kind()
            .capabilities()
            .paragraph
            .then(|| self.tree.lines(self.node))
    }

    pub fn is_paragraph(&self) -> bool {
        self.kind().capabilities().paragraph
    }
}

/// Handed to [`BlockParser::close_block`] when the block is finalized.
pub struct CloseContext<'a> {
    pub(crate) tree: &'a mut Tree,
    pub(crate) node: NodeId,
    pub(crate) source: &'a str,
    pub(crate) last_line_blank: &'a HashMap<NodeId, bool>,
}

impl CloseContext<'_> {
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn source(&self) -> &str {
        self.source
    }

    pub fn tree(&self) -> &Tree {
        self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        self.tree
    }

    /// Whether `node`, or the last item/child chain of a list, ended with a
    /// blank line.
    pub fn ends_with_blank_line(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.last_line_blank.get(&id).copied().unwrap_or(false) {
                return true;
            }
            current = match self.tree.kind(id) {
                NodeKind::List { .. } | NodeKind::ListItem { .. } => {
                    self.tree.last_content_child(id)
                }
                _ => None,
            };
        }
        false
    }
}

/// Drives one open block through the lines that follow its start.
pub trait BlockParser {
    fn try_continue(&mut self, state: &ParserState<'_>, block: NodeId) -> BlockContinue;

    /// Called with the expanded text of each line added to the block.
    fn on_line_added(&mut self, _text: &str) {}

    /// Called once when the block is finalized.
    fn close_block(&mut self, _cx: &mut CloseContext<'_>) {}
}

/// Recognises the start of a block kind.
pub trait BlockParserFactory: Dependent + Send + Sync {
    fn try_start(&self, state: &ParserState<'_>, matched: &MatchedBlock<'_>) -> Option<BlockStart>;
}
