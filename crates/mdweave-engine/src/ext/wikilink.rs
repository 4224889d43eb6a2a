use crate::parsing::config::{Extension, ParserBuilder};
use crate::parsing::inline::cursor::Cursor;
use crate::parsing::inline::types::{InlineContext, InlineMatch, InlineParserExtension};
use crate::parsing::node::NodeKind;

/// Wiki link syntax with owned delimiter constants.
pub struct WikiLink;

impl WikiLink {
    pub const OPEN: &'static [u8; 2] = b"[[";
    pub const CLOSE: &'static [u8; 2] = b"]]";
    pub const ALIAS: u8 = b'|';

    /// Option flag that leaves wiki links as literal text.
    pub const DISABLED: &'static str = "wikilink.disabled";
}

/// Parses `[[target]]` and `[[target|alias]]`. A link may not span lines.
pub struct WikiLinkParser;

impl InlineParserExtension for WikiLinkParser {
    fn trigger(&self) -> char {
        '['
    }

    fn parse(&self, cx: &InlineContext<'_>) -> Option<InlineMatch> {
        let mut cur = Cursor::new(cx.rest());
        if !cur.starts_with(WikiLink::OPEN) {
            return None;
        }
        cur.bump_n(WikiLink::OPEN.len());
        let target_start = cur.pos();

        while !cur.eof() && cur.peek() != Some(WikiLink::ALIAS) && !cur.starts_with(WikiLink::CLOSE)
        {
            if cur.peek() == Some(b'\n') {
                return None;
            }
            cur.bump();
        }
        let target_end = cur.pos();

        let mut alias = None;
        if cur.peek() == Some(WikiLink::ALIAS) {
            cur.bump();
            let alias_start = cur.pos();
            while !cur.eof() && !cur.starts_with(WikiLink::CLOSE) {
                if cur.peek() == Some(b'\n') {
                    return None;
                }
                cur.bump();
            }
            alias = Some(cx.source_span(alias_start, cur.pos()));
        }

        if !cur.starts_with(WikiLink::CLOSE) {
            return None;
        }
        cur.bump_n(WikiLink::CLOSE.len());

        Some(InlineMatch {
            len: cur.pos(),
            kind: NodeKind::WikiLink {
                target: cx.source_span(target_start, target_end),
                alias,
            },
        })
    }
}

/// Registers [`WikiLinkParser`] unless the `wikilink.disabled` flag is set.
pub struct WikiLinkExtension;

impl Extension for WikiLinkExtension {
    fn extend(&self, builder: &mut ParserBuilder) {
        if builder.options().flag(WikiLink::DISABLED) {
            return;
        }
        builder.inline_extension(WikiLinkParser);
    }
}
