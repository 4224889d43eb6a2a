use crate::parsing::blocks::types::{BlockContinue, BlockParser, ParserState};
use crate::parsing::tree::NodeId;

/// Paragraph block type (marker struct).
///
/// Paragraphs have no delimiters: the engine opens one whenever a
/// non-blank line starts no other block. Any following non-blank line that
/// starts nothing else continues it, even lazily outside its containers.
pub struct Paragraph;

#[derive(Debug, Default)]
pub struct ParagraphParser;

impl BlockParser for ParagraphParser {
    fn try_continue(&mut self, state: &ParserState<'_>, _block: NodeId) -> BlockContinue {
        if state.is_blank() {
            BlockContinue::None
        } else {
            BlockContinue::Continue
        }
    }
}
