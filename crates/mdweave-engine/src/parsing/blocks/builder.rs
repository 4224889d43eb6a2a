use std::collections::HashMap;

use log::trace;

use crate::parsing::config::ParserConfig;
use crate::parsing::node::{Category, NodeKind};
use crate::parsing::rope::{LineRef, Span};
use crate::parsing::tracker::{BlockTracker, ParserId};
use crate::parsing::tree::{NodeId, Tree};

use super::cursor::LineCursor;
use super::kinds::ParagraphParser;
use super::types::{
    BlockContinue, BlockParser, CloseContext, MatchedBlock, ParserState, Reposition, StartedBlock,
};

/// The root block: continues on every line.
struct DocumentParser;

impl BlockParser for DocumentParser {
    fn try_continue(&mut self, _state: &ParserState<'_>, _block: NodeId) -> BlockContinue {
        BlockContinue::Continue
    }
}

struct OpenBlock {
    node: NodeId,
    parser: Box<dyn BlockParser>,
    closed: bool,
    start_line: usize,
}

/// Result of the block phase, handed on to pre-processing.
pub(crate) struct BlockPhase {
    pub tree: Tree,
    pub root: NodeId,
    pub tracker: BlockTracker,
}

/// Builds the block tree one line at a time.
///
/// Each line first walks the chain of open blocks, asking each whether it
/// continues. Then, while the deepest matched block can hold new blocks,
/// the factories are tried for block starts. Whatever is left of the line
/// continues a lazy paragraph, lands in the open leaf, or opens a new
/// paragraph.
pub(crate) struct BlockBuilder<'a> {
    config: &'a ParserConfig,
    source: &'a str,
    tree: Tree,
    root: NodeId,
    parsers: Vec<OpenBlock>,
    /// Open blocks from the document down to the current tip.
    active: Vec<ParserId>,
    tracker: BlockTracker,
    last_line_blank: HashMap<NodeId, bool>,
    cursor: LineCursor<'a>,
    line_number: usize,
}

impl<'a> BlockBuilder<'a> {
    pub(crate) fn new(config: &'a ParserConfig, source: &'a str) -> Self {
        let mut tree = Tree::new();
        let root = tree.new_node(NodeKind::Document, Span::new(0, source.len()));
        let mut tracker = BlockTracker::new();
        tracker.parser_added(0, root, Category::Document);
        Self {
            config,
            source,
            tree,
            root,
            parsers: vec![OpenBlock {
                node: root,
                parser: Box::new(DocumentParser),
                closed: false,
                start_line: 0,
            }],
            active: vec![0],
            tracker,
            last_line_blank: HashMap::new(),
            cursor: LineCursor::empty(),
            line_number: 0,
        }
    }

    pub(crate) fn push_line(&mut self, line: LineRef) {
        self.cursor = LineCursor::new(&self.source[line.span.start..line.eol], line);
        self.incorporate_line();
        self.line_number += 1;
    }

    pub(crate) fn finish(mut self) -> BlockPhase {
        let open = self.active.clone();
        self.finalize_blocks(&open);
        BlockPhase {
            tree: self.tree,
            root: self.root,
            tracker: self.tracker,
        }
    }

    fn incorporate_line(&mut self) {
        let config = self.config;
        let line = self.cursor.line();

        self.cursor.find_next_non_space();
        let blank_at_start = self.cursor.is_blank();

        let mut matches = 1;
        for pos in 1..self.active.len() {
            let pid = self.active[pos];
            let node = self.parsers[pid].node;
            self.cursor.find_next_non_space();
            let state = ParserState::new(
                &self.cursor,
                &self.tree,
                &config.options,
                self.line_number,
                &self.last_line_blank,
            );
            let result = self.parsers[pid].parser.try_continue(&state, node);
            match result {
                BlockContinue::None => break,
                BlockContinue::Finalize => {
                    self.extend_to(node, line.eol);
                    self.finalize(pid);
                    return;
                }
                BlockContinue::Continue => {}
                BlockContinue::AtIndex(index) => {
                    self.cursor.advance_to_index(index);
                    if !blank_at_start {
                        self.extend_to(node, line.eol);
                    }
                }
                BlockContinue::AtColumn(column) => {
                    self.cursor.advance_to_column(column);
                    if !blank_at_start {
                        self.extend_to(node, line.eol);
                    }
                }
            }
            matches += 1;
        }

        self.cursor.find_next_non_space();
        let blank_node = (self.cursor.is_blank() && config.options.blank_lines_in_ast)
            .then(|| self.add_blank_line(matches, line.span));

        let unmatched: Vec<ParserId> = self.active[matches..].to_vec();
        let mut all_closed = unmatched.is_empty();
        let mut tip = self.active[matches - 1];
        trace!(
            "line {}: {} open blocks matched, {} unmatched",
            self.line_number,
            matches,
            unmatched.len()
        );

        // a second blank line in a row closes the outermost list
        if self.cursor.is_blank() && self.is_last_line_blank(self.parsers[tip].node) {
            if !all_closed {
                self.finalize_blocks(&unmatched);
                all_closed = true;
            }
            let matched = self.active[..matches].to_vec();
            self.break_out_of_lists(&matched);
            tip = self.active_tip();
        }

        let code_indent = config.options.code_block_indent;
        let mut try_starts = {
            let caps = self.tree.kind(self.parsers[tip].node).capabilities();
            caps.paragraph || caps.container
        };
        while try_starts {
            self.cursor.find_next_non_space();
            let next_non_space = self.cursor.next_non_space();
            let starts_with_letter = self.cursor.text()[next_non_space..]
                .chars()
                .next()
                .is_some_and(char::is_alphabetic);
            if self.cursor.is_blank() || (self.cursor.indent() < code_indent && starts_with_letter)
            {
                self.cursor.advance_to_index(next_non_space);
                break;
            }

            let Some(start) = self.find_block_start(tip) else {
                self.cursor.advance_to_index(next_non_space);
                break;
            };
            assert!(
                !start.blocks.is_empty(),
                "a block start must open at least one block"
            );
            let start_offset = line.span.start + next_non_space;

            if !all_closed {
                self.finalize_blocks(&unmatched);
                all_closed = true;
            }
            match start.reposition {
                Some(Reposition::Index(index)) => self.cursor.advance_to_index(index),
                Some(Reposition::Column(column)) => self.cursor.advance_to_column(column),
                None => {}
            }
            if start.replace_active {
                self.remove_active_parser();
            }
            for block in start.blocks {
                try_starts = block.kind.capabilities().container;
                tip = self.add_child(block, start_offset);
            }
        }

        let active_tip = self.active_tip();
        let lazy_target = self
            .tree
            .kind(self.parsers[active_tip].node)
            .capabilities()
            .paragraph;
        if !all_closed && !self.cursor.is_blank() && lazy_target {
            trace!("line {}: lazy continuation", self.line_number);
            self.add_line();
            return;
        }

        if !all_closed {
            self.finalize_blocks(&unmatched);
        }
        let tip = self.active_tip();
        self.propagate_last_line_blank(tip);

        let caps = self.tree.kind(self.parsers[tip].node).capabilities();
        if !caps.container {
            if caps.accepts_lines {
                self.add_line();
                // a blank line inside a leaf is content, not a marker
                if let Some(blank) = blank_node {
                    self.tree.unlink(blank);
                    self.tracker.block_removed(blank, Category::BlankLine);
                }
            }
        } else if !self.cursor.is_blank() {
            let start = self.cursor.content_line().content.start;
            self.add_child(StartedBlock::new(NodeKind::Paragraph, ParagraphParser), start);
            self.add_line();
        }
    }

    /// Marks a line that is blank after the prefixes of the first `matches`
    /// open blocks, inside the deepest of them that keeps blank lines.
    fn add_blank_line(&mut self, matches: usize, span: Span) -> NodeId {
        let parent = self.active[..matches]
            .iter()
            .rev()
            .map(|&pid| self.parsers[pid].node)
            .find(|&node| self.tree.kind(node).capabilities().blank_line_container)
            .unwrap_or(self.root);
        let id = self.tree.new_node(NodeKind::BlankLine, span);
        self.tree.append_child(parent, id);
        self.tracker.block_added(id, Category::BlankLine);
        id
    }

    fn active_tip(&self) -> ParserId {
        *self
            .active
            .last()
            .expect("the document block stays open until the end")
    }

    fn is_last_line_blank(&self, node: NodeId) -> bool {
        self.last_line_blank.get(&node).copied().unwrap_or(false)
    }

    /// Grows `node` and its ancestors so they end no earlier than `end`.
    fn extend_to(&mut self, node: NodeId, end: usize) {
        let chain: Vec<NodeId> = self.tree.ancestors(node).collect();
        for id in chain {
            let span = self.tree.span(id);
            if span.end < end {
                self.tree.set_span(id, Span::new(span.start, end));
            }
        }
    }

    fn find_block_start(&self, tip: ParserId) -> Option<super::types::BlockStart> {
        let state = ParserState::new(
            &self.cursor,
            &self.tree,
            &self.config.options,
            self.line_number,
            &self.last_line_blank,
        );
        let matched = MatchedBlock {
            node: self.parsers[tip].node,
            tree: &self.tree,
        };
        self.config
            .block_factories
            .iter()
            .find_map(|factory| factory.try_start(&state, &matched))
    }

    /// Opens `block` under the deepest open block able to contain it,
    /// closing blocks that cannot.
    fn add_child(&mut self, block: StartedBlock, default_start: usize) -> ParserId {
        while !self
            .tree
            .kind(self.parsers[self.active_tip()].node)
            .can_contain(&block.kind)
        {
            assert!(
                self.active.len() > 1,
                "no open block can contain {}",
                block.kind.name()
            );
            let top = self.active_tip();
            self.finalize(top);
        }

        let parent = self.parsers[self.active_tip()].node;
        let start = block.start.unwrap_or(default_start);
        let end = self.cursor.line().eol.max(start);
        let category = block.kind.category();
        trace!("line {}: open {} at {start}", self.line_number, block.kind.name());

        let node = self.tree.new_node(block.kind, Span::new(start, end));
        self.tree.append_child(parent, node);
        self.extend_to(parent, end);
        *self.tree.lines_mut(node) = block.lines;

        let pid = self.parsers.len();
        self.parsers.push(OpenBlock {
            node,
            parser: block.parser,
            closed: false,
            start_line: self.line_number,
        });
        self.active.push(pid);
        self.tracker.parser_added(pid, node, category);
        pid
    }

    /// Adds the rest of the line to the tip, which must be a leaf.
    fn add_line(&mut self) {
        let pid = self.active_tip();
        self.assert_attached(pid);
        let node = self.parsers[pid].node;
        let line = self.cursor.content_line();
        let text = line.text(self.source);
        self.parsers[pid].parser.on_line_added(&text);
        self.tree.lines_mut(node).push(line);
        self.extend_to(node, line.content.end);
    }

    /// Discards the tip block; used when a new block takes over a paragraph.
    fn remove_active_parser(&mut self) {
        let Some(pid) = self.active.pop() else {
            return;
        };
        self.parsers[pid].closed = true;
        let node = self.parsers[pid].node;
        let category = self.tree.kind(node).category();
        self.tree.unlink(node);
        self.tracker.parser_removed(pid, category);
    }

    fn finalize_blocks(&mut self, parsers: &[ParserId]) {
        for &pid in parsers.iter().rev() {
            self.finalize(pid);
        }
    }

    fn finalize(&mut self, pid: ParserId) {
        if self.active.last() == Some(&pid) {
            self.active.pop();
        }
        if self.parsers[pid].closed {
            return;
        }
        self.assert_attached(pid);
        self.parsers[pid].closed = true;
        let node = self.parsers[pid].node;

        if node != self.root && self.tree.kind(node).capabilities().container {
            if let Some(last) = self.tree.last_content_child(node) {
                let end = self.tree.span(last).end;
                self.extend_to(node, end);
            }
        }

        let mut cx = CloseContext {
            tree: &mut self.tree,
            node,
            source: self.source,
            last_line_blank: &self.last_line_blank,
        };
        self.parsers[pid].parser.close_block(&mut cx);
    }

    /// An open parser must still own a node that hangs off the document.
    fn assert_attached(&self, pid: ParserId) {
        let node = self.parsers[pid].node;
        assert_eq!(
            self.tracker.node_for(pid),
            Some(node),
            "open block parser {pid} is not tracked with its node"
        );
        assert!(
            self.tree.is_ancestor_or_self(self.root, node),
            "open {} block is no longer attached to the document",
            self.tree.kind(node).name()
        );
    }

    fn break_out_of_lists(&mut self, matched: &[ParserId]) {
        let outermost = matched.iter().position(|&pid| {
            self.tree
                .kind(self.parsers[pid].node)
                .capabilities()
                .breaks_out_on_double_blank
        });
        if let Some(index) = outermost {
            trace!("line {}: double blank line closes list", self.line_number);
            self.finalize_blocks(&matched[index..]);
        }
    }

    /// Records whether the line was blank on the tip and its ancestors.
    fn propagate_last_line_blank(&mut self, tip: ParserId) {
        let blank = self.cursor.is_blank();
        let node = self.parsers[tip].node;
        if blank {
            if let Some(last) = self.tree.last_content_child(node) {
                self.last_line_blank.insert(last, true);
            }
        }

        let kind = self.tree.kind(node);
        // an empty item that starts on this line does not end with a blank
        let empty_new_item = matches!(kind, NodeKind::ListItem { .. })
            && self.tree.first_content_child(node).is_none()
            && self.parsers[tip].start_line == self.line_number;
        let value = blank && kind.capabilities().propagates_last_blank && !empty_new_item;

        let chain: Vec<NodeId> = self.tree.ancestors(node).collect();
        for id in chain {
            self.last_line_blank.insert(id, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ParserOptions;
    use crate::parsing::ParserBuilder;
    use crate::parsing::blocks::types::{BlockParserFactory, BlockStart, StartedBlock};
    use crate::parsing::deps::{Dependent, FactoryId};
    use crate::parsing::node::{Capabilities, CustomBlockKind};

    const DETACH: CustomBlockKind = CustomBlockKind {
        name: "Detach",
        capabilities: Capabilities::LEAF,
    };

    /// A one-line block that cuts its parent out of the tree on close.
    struct DetachFactory;

    impl Dependent for DetachFactory {
        fn id(&self) -> FactoryId {
            FactoryId("test.detach")
        }
    }

    impl BlockParserFactory for DetachFactory {
        fn try_start(&self, state: &ParserState<'_>, _matched: &MatchedBlock<'_>) -> Option<BlockStart> {
            state.rest().starts_with('!').then(|| {
                BlockStart::of(StartedBlock::new(NodeKind::CustomBlock(DETACH), DetachParser))
                    .at_index(state.line().len())
            })
        }
    }

    struct DetachParser;

    impl BlockParser for DetachParser {
        fn try_continue(&mut self, _state: &ParserState<'_>, _block: NodeId) -> BlockContinue {
            BlockContinue::None
        }

        fn close_block(&mut self, cx: &mut CloseContext<'_>) {
            if let Some(parent) = cx.tree().parent(cx.node()) {
                cx.tree_mut().unlink(parent);
            }
        }
    }

    #[test]
    #[should_panic(expected = "no longer attached")]
    fn detached_open_block_fails_fast() {
        let mut builder = ParserBuilder::new(ParserOptions::default());
        builder.block_parser_factory(DetachFactory);
        builder.build().unwrap().parse("> !\n> a\n");
    }

    #[test]
    fn open_blocks_stay_tracked_until_the_end() {
        let parser = ParserBuilder::new(ParserOptions::default()).build().unwrap();
        let (phase, _) = parser.parse_blocks("> - a\n>   b\n\n```\ncode\n");
        let quote = phase.tree.children(phase.root)[0];
        assert_eq!(phase.tracker.parser_for(quote), Some(1));
        assert!(phase.tracker.contains(quote, Category::BlockQuote));
        assert_eq!(phase.tracker.items(&[Category::FencedCode]).len(), 1);
    }
}
