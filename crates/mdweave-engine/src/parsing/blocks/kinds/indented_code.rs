use crate::parsing::blocks::types::{
    BlockContinue, BlockParser, BlockParserFactory, BlockStart, CloseContext, MatchedBlock,
    ParserState, StartedBlock,
};
use crate::parsing::deps::{Dependent, FactoryId};
use crate::parsing::node::NodeKind;
use crate::parsing::tree::NodeId;

use super::BUILTIN_ORDER;

pub struct IndentedCodeFactory;

impl IndentedCodeFactory {
    pub const ID: FactoryId = FactoryId("core.indented_code");
}

impl Dependent for IndentedCodeFactory {
    fn id(&self) -> FactoryId {
        Self::ID
    }

    fn after(&self) -> &[FactoryId] {
        &BUILTIN_ORDER[..6]
    }
}

impl BlockParserFactory for IndentedCodeFactory {
    fn try_start(&self, state: &ParserState<'_>, matched: &MatchedBlock<'_>) -> Option<BlockStart> {
        // indented code never interrupts a paragraph
        if state.indent() < state.code_block_indent() || state.is_blank() || matched.is_paragraph() {
            return None;
        }
        // the span includes the indentation that makes this code
        let block = StartedBlock::new(NodeKind::IndentedCode, IndentedCodeParser)
            .starting_at(state.line_start() + state.index());
        Some(BlockStart::of(block).at_column(state.column() + state.code_block_indent()))
    }
}

struct IndentedCodeParser;

impl BlockParser for IndentedCodeParser {
    fn try_continue(&mut self, state: &ParserState<'_>, _block: NodeId) -> BlockContinue {
        if state.indent() >= state.code_block_indent() {
            BlockContinue::AtColumn(state.column() + state.code_block_indent())
        } else if state.is_blank() {
            BlockContinue::AtIndex(state.next_non_space())
        } else {
            BlockContinue::None
        }
    }

    /// Drops trailing blank lines and pulls the span back to the last kept line.
    fn close_block(&mut self, cx: &mut CloseContext<'_>) {
        let node = cx.node();
        let keep = {
            let source = cx.source();
            let lines = cx.tree().lines(node);
            lines.len()
                - lines
                    .iter()
                    .rev()
                    .take_while(|l| l.is_blank(source))
                    .count()
        };
        cx.tree_mut().lines_mut(node).truncate(keep);
        if let Some(last) = cx.tree().lines(node).last().copied() {
            let mut span = cx.tree().span(node);
            span.end = last.content.end;
            cx.tree_mut().set_span(node, span);
        }
    }
}
