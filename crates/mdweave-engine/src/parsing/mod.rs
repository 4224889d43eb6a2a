//! # Parsing
//!
//! Source text goes through three phases:
//!
//! 1. **Blocks** (`blocks`): lines are fed one at a time to the block
//!    builder, which grows the tree of open blocks
//! 2. **Pre-processing** (`preprocess`): paragraph and block rewrite passes,
//!    such as collecting reference definitions
//! 3. **Inlines** (`inline`): every block with inline content is parsed into
//!    inline nodes
//!
//! Document hooks then see the finished [`Document`].

pub mod blocks;
pub mod config;
pub mod deps;
pub mod document;
pub mod inline;
pub mod node;
pub mod preprocess;
pub mod rope;
pub mod snapshot;
pub mod tracker;
pub mod tree;

use std::io::Read;
use std::sync::Arc;

use log::debug;
use xi_rope::Rope;

use crate::error::ParseError;
use crate::options::ParserOptions;

use blocks::builder::{BlockBuilder, BlockPhase};
use inline::parser::parse_inlines;
use node::NodeKind;
use preprocess::{PreProcessContext, run_block_stages, run_paragraph_stages};
use rope::lines_with_spans;
use tree::{NodeId, Tree};

pub use config::{DocumentHook, Extension, ParserBuilder, ParserConfig};
pub use document::{Document, LinkReference, ReferenceMap};
pub use node::{Capabilities, Category, CustomBlockKind, ListMarker};
pub use rope::Span;

/// A configured parser. Cheap to clone; clones share one configuration and
/// may parse on different threads.
#[derive(Clone)]
pub struct Parser {
    pub(crate) config: Arc<ParserConfig>,
}

impl Default for Parser {
    fn default() -> Self {
        ParserBuilder::new(ParserOptions::default())
            .build()
            .expect("built-in factories are acyclic")
    }
}

impl Parser {
    pub fn builder(options: ParserOptions) -> ParserBuilder {
        ParserBuilder::new(options)
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn parse(&self, text: &str) -> Document {
        self.run(text, Rope::from(text))
    }

    pub fn parse_rope(&self, rope: &Rope) -> Document {
        let text = String::from(rope);
        self.run(&text, rope.clone())
    }

    /// Reads all of `reader`, then parses it. Only the read can fail.
    pub fn parse_reader<R: Read>(&self, mut reader: R) -> Result<Document, ParseError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(self.parse(&text))
    }

    fn run(&self, source: &str, rope: Rope) -> Document {
        let (phase, references) = self.parse_blocks(source);
        let BlockPhase { mut tree, root, .. } = phase;

        let inline_blocks: Vec<NodeId> = tree
            .descendants(root)
            .filter(|&id| tree.kind(id).capabilities().inline_content)
            .collect();
        for block in inline_blocks {
            parse_inlines(&self.config, &references, &mut tree, block, source);
        }

        let mut document = Document::new(rope, tree, root, references);
        for hook in &self.config.document_hooks {
            hook.finalize_document(&mut document);
        }
        if self.config.options.blank_lines_in_ast {
            relocate_trailing_blank_lines(document.tree_mut(), root, root);
        }
        debug!(
            "parsed {} bytes into {} nodes",
            source.len(),
            document.tree().len()
        );
        document
    }

    /// Block phase plus pre-processing.
    pub(crate) fn parse_blocks(&self, source: &str) -> (BlockPhase, ReferenceMap) {
        let mut builder = BlockBuilder::new(&self.config, source);
        for line in lines_with_spans(source) {
            builder.push_line(line);
        }
        let mut phase = builder.finish();

        let mut references = ReferenceMap::new();
        let mut cx = PreProcessContext {
            tree: &mut phase.tree,
            tracker: &mut phase.tracker,
            references: &mut references,
            source,
            options: &self.config.options,
        };
        run_paragraph_stages(&self.config.paragraph_stages, &mut cx);
        run_block_stages(&self.config.block_stages, &mut cx);
        (phase, references)
    }
}

/// Parses `text` with the default configuration.
pub fn parse_document(text: &str) -> Document {
    Parser::default().parse(text)
}

/// Moves blank-line nodes at the tail of a container out to follow it, so
/// they bubble up to the document level.
fn relocate_trailing_blank_lines(tree: &mut Tree, root: NodeId, node: NodeId) {
    let blocks: Vec<NodeId> = tree
        .children(node)
        .iter()
        .copied()
        .filter(|&c| tree.kind(c).capabilities().container)
        .collect();
    for child in blocks {
        relocate_trailing_blank_lines(tree, root, child);
    }
    if node == root {
        return;
    }
    while let Some(last) = tree.last_child(node) {
        if tree.kind(last) != &NodeKind::BlankLine {
            break;
        }
        tree.unlink(last);
        tree.insert_after(node, last);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn kinds(doc: &Document, node: NodeId) -> Vec<&'static str> {
        doc.tree()
            .children(node)
            .iter()
            .map(|&c| doc.tree().kind(c).name())
            .collect()
    }

    #[test]
    fn empty_input_is_an_empty_document() {
        let doc = parse_document("");
        assert!(doc.tree().children(doc.root()).is_empty());
        assert_eq!(doc.tree().kind(doc.root()), &NodeKind::Document);
    }

    #[test]
    fn reader_input_matches_text_input() {
        let parser = Parser::default();
        let doc = parser.parse_reader("# Title\n\nbody\n".as_bytes()).unwrap();
        assert_eq!(kinds(&doc, doc.root()), vec!["Heading", "Paragraph"]);
    }

    #[test]
    fn rope_input_matches_text_input() {
        let parser = Parser::default();
        let rope = Rope::from("> quote\n");
        let doc = parser.parse_rope(&rope);
        assert_eq!(doc.outline(), parser.parse("> quote\n").outline());
    }

    #[test]
    fn blank_lines_leave_closed_containers() {
        let options = ParserOptions {
            blank_lines_in_ast: true,
            ..ParserOptions::default()
        };
        let parser = ParserBuilder::new(options).build().unwrap();
        let doc = parser.parse("- a\n\n- b\n\nc\n");
        assert_eq!(kinds(&doc, doc.root()), vec!["List", "BlankLine", "Paragraph"]);
        let list = doc.tree().children(doc.root())[0];
        assert_eq!(kinds(&doc, list), vec!["ListItem", "BlankLine", "ListItem"]);
        for &item in doc.tree().children(list) {
            let last = doc.tree().last_child(item).map(|c| doc.tree().kind(c));
            assert_ne!(last, Some(&NodeKind::BlankLine));
        }
    }

    #[test]
    fn line_blank_after_quote_prefix_is_marked_in_the_quote() {
        let options = ParserOptions {
            blank_lines_in_ast: true,
            ..ParserOptions::default()
        };
        let parser = ParserBuilder::new(options).build().unwrap();
        let doc = parser.parse("> a\n>\n> b");
        snapshot::invariants(&doc);
        assert_eq!(kinds(&doc, doc.root()), vec!["BlockQuote"]);
        let quote = doc.tree().children(doc.root())[0];
        assert_eq!(kinds(&doc, quote), vec!["Paragraph", "BlankLine", "Paragraph"]);
        let blank = doc.tree().children(quote)[1];
        assert_eq!(doc.tree().span(blank), Span::new(4, 5));
    }

    #[test]
    fn blank_lines_inside_code_are_content() {
        let options = ParserOptions {
            blank_lines_in_ast: true,
            ..ParserOptions::default()
        };
        let parser = ParserBuilder::new(options).build().unwrap();
        let doc = parser.parse("```\na\n\nb\n```\n");
        assert_eq!(kinds(&doc, doc.root()), vec!["FencedCode"]);
    }

    /// Records how many references the document ended up with.
    struct CountReferences;

    impl DocumentHook for CountReferences {
        fn finalize_document(&self, document: &mut Document) {
            let root = document.root();
            let count = document.references().len();
            let note = document
                .tree_mut()
                .new_node(NodeKind::CustomInline("count"), Span::new(0, count));
            document.tree_mut().append_child(root, note);
        }
    }

    #[test]
    fn document_hooks_run_after_inlines() {
        let mut builder = ParserBuilder::new(ParserOptions::default());
        builder.document_hook(CountReferences);
        let parser = builder.build().unwrap();
        let doc = parser.parse("[a]: /a\n[b]: /b\n\n[a]\n");
        let last = doc.tree().last_child(doc.root()).unwrap();
        assert_eq!(doc.tree().kind(last), &NodeKind::CustomInline("count"));
        assert_eq!(doc.tree().span(last), Span::new(0, 2));
        let para = doc.tree().children(doc.root())[2];
        assert_eq!(doc.tree().kind(para), &NodeKind::Paragraph);
        assert!(matches!(
            doc.tree().kind(doc.tree().children(para)[0]),
            NodeKind::Link { .. }
        ));
    }
}
