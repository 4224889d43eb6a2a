use crate::parsing::blocks::types::{
    BlockContinue, BlockParser, BlockParserFactory, BlockStart, MatchedBlock, ParserState,
    StartedBlock,
};
use crate::parsing::deps::{Dependent, FactoryId};
use crate::parsing::node::NodeKind;
use crate::parsing::tree::NodeId;

use super::BUILTIN_ORDER;

/// Three or more matching `*`, `-` or `_`, optionally separated by spaces.
pub struct ThematicBreak;

impl ThematicBreak {
    pub const MARKERS: [u8; 3] = [b'*', b'-', b'_'];

    pub fn matches(rest: &str) -> bool {
        let Some(&first) = rest.as_bytes().first() else {
            return false;
        };
        if !Self::MARKERS.contains(&first) {
            return false;
        }
        let mut count = 0;
        for b in rest.bytes() {
            match b {
                b' ' | b'\t' => {}
                _ if b == first => count += 1,
                _ => return false,
            }
        }
        count >= 3
    }
}

pub struct ThematicBreakFactory;

impl ThematicBreakFactory {
    pub const ID: FactoryId = FactoryId("core.thematic_break");
}

impl Dependent for ThematicBreakFactory {
    fn id(&self) -> FactoryId {
        Self::ID
    }

    fn after(&self) -> &[FactoryId] {
        &BUILTIN_ORDER[..4]
    }
}

impl BlockParserFactory for ThematicBreakFactory {
    fn try_start(&self, state: &ParserState<'_>, _matched: &MatchedBlock<'_>) -> Option<BlockStart> {
        if state.indent() >= state.code_block_indent() || !ThematicBreak::matches(state.rest()) {
            return None;
        }
        Some(
            BlockStart::of(StartedBlock::new(NodeKind::ThematicBreak, ThematicBreakParser))
                .at_index(state.line().len()),
        )
    }
}

struct ThematicBreakParser;

impl BlockParser for ThematicBreakParser {
    fn try_continue(&mut self, _state: &ParserState<'_>, _block: NodeId) -> BlockContinue {
        BlockContinue::None
    }
}
