use crate::parsing::blocks::content::BlockLine;
use crate::parsing::blocks::types::{
    BlockContinue, BlockParser, BlockParserFactory, BlockStart, MatchedBlock, ParserState,
    StartedBlock,
};
use crate::parsing::deps::{Dependent, FactoryId};
use crate::parsing::node::NodeKind;
use crate::parsing::rope::Span;
use crate::parsing::tree::NodeId;

use super::BUILTIN_ORDER;

/// ATX (`## Title`) and setext (`Title` over `===`/`---`) heading syntax.
pub struct Heading;

impl Heading {
    pub const ATX_MARKER: u8 = b'#';
    pub const MAX_LEVEL: usize = 6;

    /// Level of an ATX opening sequence at the start of `rest`.
    pub fn atx_level(rest: &str) -> Option<u8> {
        let bytes = rest.as_bytes();
        let hashes = bytes.iter().take_while(|&&b| b == Self::ATX_MARKER).count();
        if hashes == 0 || hashes > Self::MAX_LEVEL {
            return None;
        }
        match bytes.get(hashes) {
            None | Some(b' ' | b'\t') => Some(hashes as u8),
            _ => None,
        }
    }

    /// Byte range of an ATX heading's content within `rest`, with the
    /// opening sequence, surrounding whitespace and any closing sequence
    /// removed.
    pub fn atx_content(rest: &str, level: u8) -> (usize, usize) {
        let is_ws = |c: char| c == ' ' || c == '\t';
        let after = &rest[level as usize..];
        let start = level as usize + (after.len() - after.trim_start_matches(is_ws).len());
        let trimmed = rest[start..].trim_end_matches(is_ws);
        let without_hashes = trimmed.trim_end_matches('#');
        let end = if without_hashes.is_empty() {
            start
        } else if without_hashes.len() < trimmed.len() && without_hashes.ends_with(is_ws) {
            start + without_hashes.trim_end_matches(is_ws).len()
        } else {
            start + trimmed.len()
        };
        (start, end)
    }

    /// Level of a setext underline (`=` gives 1, `-` gives 2).
    pub fn setext_level(rest: &str) -> Option<u8> {
        let line = rest.trim_end_matches([' ', '\t']);
        let first = line.bytes().next()?;
        let level = match first {
            b'=' => 1,
            b'-' => 2,
            _ => return None,
        };
        line.bytes().all(|b| b == first).then_some(level)
    }
}

pub struct HeadingFactory;

impl HeadingFactory {
    pub const ID: FactoryId = FactoryId("core.heading");
}

impl Dependent for HeadingFactory {
    fn id(&self) -> FactoryId {
        Self::ID
    }

    fn after(&self) -> &[FactoryId] {
        &BUILTIN_ORDER[..1]
    }
}

impl BlockParserFactory for HeadingFactory {
    fn try_start(&self, state: &ParserState<'_>, matched: &MatchedBlock<'_>) -> Option<BlockStart> {
        if state.indent() >= state.code_block_indent() {
            return None;
        }
        let rest = state.rest();
        let line_end = state.line().len();

        if let Some(level) = Heading::atx_level(rest) {
            let (start, end) = Heading::atx_content(rest, level);
            let base = state.line_start() + state.next_non_space();
            let lines = if start < end {
                vec![BlockLine {
                    raw_line: state.line_span(),
                    content: Span::new(base + start, base + end),
                    tab_fill: 0,
                }]
            } else {
                Vec::new()
            };
            let heading = NodeKind::Heading {
                level,
                setext: false,
            };
            return Some(
                BlockStart::of(StartedBlock::new(heading, HeadingParser).with_lines(lines))
                    .at_index(line_end),
            );
        }

        let lines = matched.paragraph_lines()?;
        let level = Heading::setext_level(rest)?;
        let heading = NodeKind::Heading {
            level,
            setext: true,
        };
        Some(
            BlockStart::of(
                StartedBlock::new(heading, HeadingParser)
                    .with_lines(lines.to_vec())
                    .starting_at(matched.span().start),
            )
            .at_index(line_end)
            .replacing_active(),
        )
    }
}

/// Headings are single-line blocks.
struct HeadingParser;

impl BlockParser for HeadingParser {
    fn try_continue(&mut self, _state: &ParserState<'_>, _block: NodeId) -> BlockContinue {
        BlockContinue::None
    }
}
