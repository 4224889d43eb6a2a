use crate::parsing::blocks::types::{
    BlockContinue, BlockParser, BlockParserFactory, BlockStart, MatchedBlock, ParserState,
    StartedBlock,
};
use crate::parsing::deps::{Dependent, FactoryId};
use crate::parsing::node::NodeKind;
use crate::parsing::tree::NodeId;

/// Blockquote syntax: a `>` at most three columns in, optionally followed
/// by one space (or one column of a tab) that belongs to the marker.
pub struct BlockQuote;

impl BlockQuote {
    /// The blockquote prefix character.
    pub const PREFIX: u8 = b'>';

    fn marker_at(state: &ParserState<'_>) -> bool {
        state.indent() < state.code_block_indent()
            && state.byte_at(state.next_non_space()) == Some(Self::PREFIX)
    }

    /// Column where the quoted content begins.
    fn content_column(state: &ParserState<'_>) -> usize {
        let mut column = state.next_non_space_column() + 1;
        if matches!(state.byte_at(state.next_non_space() + 1), Some(b' ' | b'\t')) {
            column += 1;
        }
        column
    }
}

pub struct BlockQuoteFactory;

impl BlockQuoteFactory {
    pub const ID: FactoryId = FactoryId("core.block_quote");
}

impl Dependent for BlockQuoteFactory {
    fn id(&self) -> FactoryId {
        Self::ID
    }
}

impl BlockParserFactory for BlockQuoteFactory {
    fn try_start(&self, state: &ParserState<'_>, _matched: &MatchedBlock<'_>) -> Option<BlockStart> {
        if !BlockQuote::marker_at(state) {
            return None;
        }
        Some(
            BlockStart::of(StartedBlock::new(NodeKind::BlockQuote, BlockQuoteParser))
                .at_column(BlockQuote::content_column(state)),
        )
    }
}

struct BlockQuoteParser;

impl BlockParser for BlockQuoteParser {
    fn try_continue(&mut self, state: &ParserState<'_>, _block: NodeId) -> BlockContinue {
        if BlockQuote::marker_at(state) {
            BlockContinue::AtColumn(BlockQuote::content_column(state))
        } else {
            BlockContinue::None
        }
    }
}
