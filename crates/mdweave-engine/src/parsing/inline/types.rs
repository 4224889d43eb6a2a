use crate::parsing::blocks::content::JoinedContent;
use crate::parsing::node::NodeKind;
use crate::parsing::rope::Span;

/// A self-contained inline construct recognised at a trigger character,
/// such as `[[wiki links]]`. Extensions are tried before the built-in
/// handling of their trigger.
pub trait InlineParserExtension: Send + Sync {
    fn trigger(&self) -> char;

    fn parse(&self, cx: &InlineContext<'_>) -> Option<InlineMatch>;
}

/// What an extension sees: the text from the trigger on, and a way to turn
/// offsets within it into source offsets.
pub struct InlineContext<'a> {
    pub(crate) content: &'a JoinedContent,
    pub(crate) pos: usize,
}

impl InlineContext<'_> {
    /// The block's text from the trigger character to the end.
    pub fn rest(&self) -> &str {
        &self.content.text()[self.pos..]
    }

    /// Source offset of the byte `offset` bytes after the trigger.
    pub fn source_offset(&self, offset: usize) -> usize {
        self.content.to_source(self.pos + offset)
    }

    /// Source span of `[start, end)` relative to the trigger.
    pub fn source_span(&self, start: usize, end: usize) -> Span {
        Span::new(self.source_offset(start), self.source_offset(end))
    }
}

/// A recognised construct: `len` bytes from the trigger become one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMatch {
    pub len: usize,
    pub kind: NodeKind,
}
