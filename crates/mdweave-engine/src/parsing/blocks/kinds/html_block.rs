use std::sync::OnceLock;

use regex::Regex;

use crate::parsing::blocks::types::{
    BlockContinue, BlockParser, BlockParserFactory, BlockStart, MatchedBlock, ParserState,
    StartedBlock,
};
use crate::parsing::deps::{Dependent, FactoryId};
use crate::parsing::node::NodeKind;
use crate::parsing::tree::NodeId;

use super::BUILTIN_ORDER;

const BLOCK_TAGS: &str = "address|article|aside|base|basefont|blockquote|body|caption|center|col|colgroup|dd|details|dialog|dir|div|dl|dt|fieldset|figcaption|figure|footer|form|frame|frameset|h1|h2|h3|h4|h5|h6|head|header|hr|html|iframe|legend|li|link|main|menu|menuitem|nav|noframes|ol|optgroup|option|p|param|search|section|summary|table|tbody|td|tfoot|th|thead|title|tr|track|ul";

struct HtmlPattern {
    kind: u8,
    open: Regex,
    /// `None` means the block ends at the next blank line.
    close: Option<Regex>,
}

fn patterns() -> &'static [HtmlPattern] {
    static PATTERNS: OnceLock<Vec<HtmlPattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let re = |s: &str| Regex::new(s).expect("Invalid HTML block regex");
        vec![
            HtmlPattern {
                kind: 1,
                open: re(r"(?i)^<(?:script|pre|style|textarea)(?:\s|>|$)"),
                close: Some(re(r"(?i)</(?:script|pre|style|textarea)>")),
            },
            HtmlPattern {
                kind: 2,
                open: re(r"^<!--"),
                close: Some(re(r"-->")),
            },
            HtmlPattern {
                kind: 3,
                open: re(r"^<\?"),
                close: Some(re(r"\?>")),
            },
            HtmlPattern {
                kind: 4,
                open: re(r"^<![A-Za-z]"),
                close: Some(re(r">")),
            },
            HtmlPattern {
                kind: 5,
                open: re(r"^<!\[CDATA\["),
                close: Some(re(r"\]\]>")),
            },
            HtmlPattern {
                kind: 6,
                open: re(&format!(r"(?i)^</?(?:{BLOCK_TAGS})(?:\s|/?>|$)")),
                close: None,
            },
        ]
    })
}

pub struct HtmlBlockFactory;

impl HtmlBlockFactory {
    pub const ID: FactoryId = FactoryId("core.html_block");
}

impl Dependent for HtmlBlockFactory {
    fn id(&self) -> FactoryId {
        Self::ID
    }

    fn after(&self) -> &[FactoryId] {
        &BUILTIN_ORDER[..3]
    }
}

impl BlockParserFactory for HtmlBlockFactory {
    fn try_start(&self, state: &ParserState<'_>, _matched: &MatchedBlock<'_>) -> Option<BlockStart> {
        if state.indent() >= state.code_block_indent() || !state.rest().starts_with('<') {
            return None;
        }
        let rest = state.rest();
        let pattern = patterns().iter().find(|p| p.open.is_match(rest))?;
        let parser = HtmlBlockParser {
            close: pattern.close.as_ref(),
            finished: false,
        };
        // no reposition: the block keeps the line's leading whitespace
        Some(BlockStart::of(StartedBlock::new(
            NodeKind::HtmlBlock {
                html_kind: pattern.kind,
            },
            parser,
        )))
    }
}

struct HtmlBlockParser {
    close: Option<&'static Regex>,
    finished: bool,
}

impl BlockParser for HtmlBlockParser {
    fn try_continue(&mut self, state: &ParserState<'_>, _block: NodeId) -> BlockContinue {
        if self.finished || (self.close.is_none() && state.is_blank()) {
            BlockContinue::None
        } else {
            BlockContinue::Continue
        }
    }

    fn on_line_added(&mut self, text: &str) {
        if self.close.is_some_and(|re| re.is_match(text)) {
            self.finished = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::parsing::node::NodeKind;
    use crate::parsing::parse_document;

    fn first_block(src: &str) -> (NodeKind, String) {
        let doc = parse_document(src);
        let first = doc.tree().children(doc.root())[0];
        (doc.tree().kind(first).clone(), doc.text(first))
    }

    #[test]
    fn block_tag_runs_until_blank_line() {
        let (kind, text) = first_block("<div>\n*not emphasis*\n\nafter\n");
        assert_eq!(kind, NodeKind::HtmlBlock { html_kind: 6 });
        assert_eq!(text, "<div>\n*not emphasis*");
    }

    #[test]
    fn comment_closes_on_terminator_line() {
        let doc = parse_document("<!-- a\nb -->\nafter\n");
        let children = doc.tree().children(doc.root());
        assert_eq!(children.len(), 2);
        assert_eq!(doc.text(children[0]), "<!-- a\nb -->");
        assert_eq!(doc.tree().kind(children[1]), &NodeKind::Paragraph);
    }

    #[test]
    fn script_may_contain_blank_lines() {
        let (kind, text) = first_block("<script>\n\nx\n</script>\n");
        assert_eq!(kind, NodeKind::HtmlBlock { html_kind: 1 });
        assert_eq!(text, "<script>\n\nx\n</script>");
    }

    #[test]
    fn inline_tag_is_not_a_block() {
        let (kind, _) = first_block("<span>x</span>\n");
        assert_eq!(kind, NodeKind::Paragraph);
    }
}
