use crate::parsing::blocks::types::{
    BlockContinue, BlockParser, BlockParserFactory, BlockStart, MatchedBlock, ParserState,
    StartedBlock,
};
use crate::parsing::config::{Extension, ParserBuilder};
use crate::parsing::deps::{Dependent, FactoryId};
use crate::parsing::node::{Capabilities, CustomBlockKind, NodeKind};
use crate::parsing::tree::NodeId;

/// Aside blocks: lines prefixed with `|`, nested and continued like block
/// quotes.
pub struct Aside;

impl Aside {
    pub const PREFIX: u8 = b'|';

    pub const KIND: CustomBlockKind = CustomBlockKind {
        name: "Aside",
        capabilities: Capabilities {
            propagates_last_blank: false,
            ..Capabilities::CONTAINER
        },
    };

    /// Lines without the prefix continue the aside until a blank line.
    pub const EXTEND_TO_BLANK_LINE: &'static str = "aside.extend_to_blank_line";
    /// Blank lines do not close the aside.
    pub const IGNORE_BLANK_LINE: &'static str = "aside.ignore_blank_line";

    fn marker_at(state: &ParserState<'_>, marker: u8) -> bool {
        state.indent() < state.code_block_indent()
            && state.byte_at(state.next_non_space()) == Some(marker)
    }

    fn content_column(state: &ParserState<'_>) -> usize {
        let mut column = state.next_non_space_column() + 1;
        if matches!(state.byte_at(state.next_non_space() + 1), Some(b' ' | b'\t')) {
            column += 1;
        }
        column
    }

    fn start(state: &ParserState<'_>, marker: u8) -> Option<BlockStart> {
        if !Self::marker_at(state, marker) {
            return None;
        }
        let parser = AsideParser {
            marker,
            extend_to_blank_line: state.options().flag(Self::EXTEND_TO_BLANK_LINE),
            ignore_blank_line: state.options().flag(Self::IGNORE_BLANK_LINE),
        };
        Some(
            BlockStart::of(StartedBlock::new(NodeKind::CustomBlock(Self::KIND), parser))
                .at_column(Self::content_column(state)),
        )
    }
}

pub struct AsideFactory;

impl AsideFactory {
    pub const ID: FactoryId = FactoryId("aside.block");
}

impl Dependent for AsideFactory {
    fn id(&self) -> FactoryId {
        Self::ID
    }
}

impl BlockParserFactory for AsideFactory {
    fn try_start(&self, state: &ParserState<'_>, _matched: &MatchedBlock<'_>) -> Option<BlockStart> {
        Aside::start(state, Aside::PREFIX)
    }
}

struct AsideParser {
    marker: u8,
    extend_to_blank_line: bool,
    ignore_blank_line: bool,
}

impl BlockParser for AsideParser {
    fn try_continue(&mut self, state: &ParserState<'_>, _block: NodeId) -> BlockContinue {
        if Aside::marker_at(state, self.marker) {
            BlockContinue::AtColumn(Aside::content_column(state))
        } else if state.is_blank() && self.ignore_blank_line {
            BlockContinue::Continue
        } else if !state.is_blank() && self.extend_to_blank_line {
            BlockContinue::AtIndex(state.index())
        } else {
            BlockContinue::None
        }
    }
}

pub struct AsideExtension;

impl Extension for AsideExtension {
    fn extend(&self, builder: &mut ParserBuilder) {
        builder.block_parser_factory(AsideFactory);
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::options::ParserOptions;
    use crate::parsing::document::Document;
    use crate::parsing::snapshot;

    fn parse(options: ParserOptions, input: &str) -> Document {
        let parser = ParserBuilder::new(options)
            .with_extension(&AsideExtension)
            .build()
            .unwrap();
        let doc = parser.parse(input);
        snapshot::invariants(&doc);
        doc
    }

    fn names(doc: &Document, node: NodeId) -> Vec<&'static str> {
        doc.tree()
            .children(node)
            .iter()
            .map(|&c| doc.tree().kind(c).name())
            .collect()
    }

    #[test]
    fn lazy_line_continues_the_aside_paragraph() {
        let doc = parse(ParserOptions::default(), "| foo\nbar");
        assert_snapshot!(doc.outline(), @r#"
        Document [0..9]
          Aside [0..9]
            Paragraph [2..9]
              Text [2..5] "foo"
              SoftBreak [5..6]
              Text [6..9] "bar"
        "#);
    }

    #[test]
    fn list_nests_inside_an_aside() {
        let doc = parse(ParserOptions::default(), "| - a\n|   b");
        assert_snapshot!(doc.outline(), @r#"
        Document [0..11]
          Aside [0..11]
            List('-', tight) [2..11]
              ListItem('-') [2..11]
                Paragraph [4..11]
                  Text [4..5] "a"
                  SoftBreak [5..10]
                  Text [10..11] "b"
        "#);
    }

    /// Claims `>` for asides, ahead of the built-in block quote.
    struct QuoteAsAside;

    impl Dependent for QuoteAsAside {
        fn id(&self) -> FactoryId {
            FactoryId("test.quote_as_aside")
        }
    }

    impl BlockParserFactory for QuoteAsAside {
        fn try_start(
            &self,
            state: &ParserState<'_>,
            _matched: &MatchedBlock<'_>,
        ) -> Option<BlockStart> {
            Aside::start(state, b'>')
        }
    }

    #[test]
    fn extension_factory_wins_over_builtin_block_quote() {
        let mut builder = ParserBuilder::new(ParserOptions::default());
        builder.block_parser_factory(QuoteAsAside);
        let doc = builder.build().unwrap().parse("> a\n");
        snapshot::invariants(&doc);
        assert_snapshot!(doc.outline(), @r#"
        Document [0..4]
          Aside [0..3]
            Paragraph [2..3]
              Text [2..3] "a"
        "#);
    }

    #[test]
    fn unprefixed_block_leaves_the_aside() {
        let doc = parse(ParserOptions::default(), "| a\n- b\n");
        assert_eq!(names(&doc, doc.root()), vec!["Aside", "List"]);
    }

    #[test]
    fn extend_to_blank_line_keeps_unprefixed_blocks_inside() {
        let options = ParserOptions::default().with(Aside::EXTEND_TO_BLANK_LINE, true);
        let doc = parse(options, "| a\n- b\n\nc\n");
        assert_eq!(names(&doc, doc.root()), vec!["Aside", "Paragraph"]);
        let aside = doc.tree().children(doc.root())[0];
        assert_eq!(names(&doc, aside), vec!["Paragraph", "List"]);
    }

    #[test]
    fn blank_line_splits_asides_unless_ignored() {
        let doc = parse(ParserOptions::default(), "| a\n\n| b\n");
        assert_eq!(names(&doc, doc.root()), vec!["Aside", "Aside"]);

        let options = ParserOptions::default().with(Aside::IGNORE_BLANK_LINE, true);
        let doc = parse(options, "| a\n\n| b\n");
        assert_eq!(names(&doc, doc.root()), vec!["Aside"]);
        let aside = doc.tree().children(doc.root())[0];
        assert_eq!(names(&doc, aside), vec!["Paragraph", "Paragraph"]);
    }
}
