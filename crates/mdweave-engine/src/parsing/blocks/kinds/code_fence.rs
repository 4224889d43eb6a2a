use crate::parsing::blocks::types::{
    BlockContinue, BlockParser, BlockParserFactory, BlockStart, CloseContext, MatchedBlock,
    ParserState, StartedBlock,
};
use crate::parsing::deps::{Dependent, FactoryId};
use crate::parsing::node::NodeKind;
use crate::parsing::rope::Span;
use crate::parsing::tree::NodeId;

use super::BUILTIN_ORDER;

/// Fenced code syntax: a run of at least three backticks or tildes.
pub struct CodeFence;

impl CodeFence {
    pub const BACKTICK: u8 = b'`';
    pub const TILDE: u8 = b'~';
    pub const MIN_LEN: usize = 3;

    /// Fence character and run length when `rest` opens a fence. A
    /// backtick fence's info string may not contain backticks.
    pub fn opener(rest: &str) -> Option<(u8, usize)> {
        let first = *rest.as_bytes().first()?;
        if first != Self::BACKTICK && first != Self::TILDE {
            return None;
        }
        let len = rest.bytes().take_while(|&b| b == first).count();
        if len < Self::MIN_LEN {
            return None;
        }
        if first == Self::BACKTICK && rest[len..].contains('`') {
            return None;
        }
        Some((first, len))
    }

    /// Whether `rest` closes a fence opened with `len` copies of `fence`.
    pub fn closes(fence: u8, len: usize, rest: &str) -> bool {
        let run = rest.bytes().take_while(|&b| b == fence).count();
        run >= len && rest[run..].bytes().all(|b| b == b' ' || b == b'\t')
    }
}

pub struct FencedCodeFactory;

impl FencedCodeFactory {
    pub const ID: FactoryId = FactoryId("core.fenced_code");
}

impl Dependent for FencedCodeFactory {
    fn id(&self) -> FactoryId {
        Self::ID
    }

    fn after(&self) -> &[FactoryId] {
        &BUILTIN_ORDER[..2]
    }
}

impl BlockParserFactory for FencedCodeFactory {
    fn try_start(&self, state: &ParserState<'_>, _matched: &MatchedBlock<'_>) -> Option<BlockStart> {
        if state.indent() >= state.code_block_indent() {
            return None;
        }
        let (fence, fence_len) = CodeFence::opener(state.rest())?;
        let kind = NodeKind::FencedCode {
            fence: fence as char,
            fence_len,
            fence_indent: state.indent(),
            info: None,
        };
        let parser = FencedCodeParser {
            fence,
            fence_len,
            fence_indent: state.indent(),
        };
        Some(
            BlockStart::of(StartedBlock::new(kind, parser))
                .at_index(state.next_non_space() + fence_len),
        )
    }
}

/// Collects raw lines until a closing fence. The first collected line is
/// the info string, moved into the node kind on close.
struct FencedCodeParser {
    fence: u8,
    fence_len: usize,
    fence_indent: usize,
}

impl BlockParser for FencedCodeParser {
    fn try_continue(&mut self, state: &ParserState<'_>, _block: NodeId) -> BlockContinue {
        if state.indent() < state.code_block_indent()
            && CodeFence::closes(self.fence, self.fence_len, state.rest())
        {
            return BlockContinue::Finalize;
        }
        // strip up to the opening fence's indentation
        let mut index = state.index();
        let mut strip = self.fence_indent;
        while strip > 0 && state.byte_at(index) == Some(b' ') {
            index += 1;
            strip -= 1;
        }
        BlockContinue::AtIndex(index)
    }

    fn close_block(&mut self, cx: &mut CloseContext<'_>) {
        let node = cx.node();
        if cx.tree().lines(node).is_empty() {
            return;
        }
        let first = cx.tree_mut().lines_mut(node).remove(0);
        let raw = &cx.source()[first.content.start..first.content.end];
        let leading = raw.len() - raw.trim_start().len();
        let trimmed = raw.trim();
        let info = (!trimmed.is_empty()).then(|| {
            let start = first.content.start + leading;
            Span::new(start, start + trimmed.len())
        });
        if let NodeKind::FencedCode { info: slot, .. } = &mut cx.tree_mut().node_mut(node).kind {
            *slot = info;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::parsing::parse_document;

    #[rstest]
    #[case("```rust", Some((b'`', 3)))]
    #[case("~~~~", Some((b'~', 4)))]
    #[case("``", None)]
    #[case("``` a`b", None)]
    #[case("~~~ a~b", Some((b'~', 3)))]
    #[case("text", None)]
    fn detect_openers(#[case] rest: &str, #[case] expected: Option<(u8, usize)>) {
        assert_eq!(CodeFence::opener(rest), expected);
    }

    #[rstest]
    #[case("```", true)]
    #[case("`````  ", true)]
    #[case("``", false)]
    #[case("``` x", false)]
    #[case("~~~", false)]
    fn detect_closers(#[case] rest: &str, #[case] expected: bool) {
        assert_eq!(CodeFence::closes(b'`', 3, rest), expected);
    }

    #[test]
    fn fenced_block_collects_raw_lines_and_info() {
        let src = "```rust\nfn main() {}\n\n  # not a heading\n```\nafter\n";
        let doc = parse_document(src);
        let children = doc.tree().children(doc.root());
        assert_eq!(children.len(), 2);
        let code = children[0];
        let lines: Vec<_> = doc
            .tree()
            .lines(code)
            .iter()
            .map(|l| l.text(src).into_owned())
            .collect();
        assert_eq!(lines, vec!["fn main() {}", "", "  # not a heading"]);
        let NodeKind::FencedCode { info, .. } = doc.tree().kind(code) else {
            panic!("expected fenced code");
        };
        assert_eq!(info.map(|s| &src[s.start..s.end]), Some("rust"));
        assert_eq!(doc.text(code), "```rust\nfn main() {}\n\n  # not a heading\n```");
    }

    #[test]
    fn opening_indent_is_stripped_from_content() {
        let src = "  ```\n    x\n y\n  ```\n";
        let doc = parse_document(src);
        let code = doc.tree().children(doc.root())[0];
        let lines: Vec<_> = doc
            .tree()
            .lines(code)
            .iter()
            .map(|l| l.text(src).into_owned())
            .collect();
        assert_eq!(lines, vec!["  x", "y"]);
    }

    #[test]
    fn unterminated_fence_runs_to_end_of_document() {
        let doc = parse_document("~~~\na\nb");
        let code = doc.tree().children(doc.root())[0];
        assert_eq!(doc.tree().lines(code).len(), 2);
        assert_eq!(doc.text(code), "~~~\na\nb");
    }
}
