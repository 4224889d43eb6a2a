//! # Pre-processing
//!
//! Rewrite passes over the finished block tree, run before inline parsing.
//!
//! Paragraph pre-processors look at the start of each paragraph and report
//! how many bytes of its content they consumed; the pipeline then trims the
//! paragraph, or removes it once nothing but whitespace is left. Block
//! pre-processors visit blocks of chosen categories and rewrite the tree
//! directly.
//!
//! Both kinds run in dependency stages. A paragraph stage with several
//! members repeats until a whole pass changes nothing; a single-member
//! stage runs once.

pub mod reference;

use std::sync::Arc;

use log::trace;

use crate::options::ParserOptions;
use crate::parsing::blocks::content::JoinedContent;
use crate::parsing::deps::{Dependent, Stage};
use crate::parsing::document::ReferenceMap;
use crate::parsing::node::{Category, NodeKind};
use crate::parsing::rope::Span;
use crate::parsing::tracker::BlockTracker;
use crate::parsing::tree::{NodeId, Tree};

pub use reference::ReferencePreProcessorFactory;

pub trait ParagraphPreProcessorFactory: Dependent + Send + Sync {
    /// A fresh pre-processor for one parse.
    fn create(&self, options: &ParserOptions) -> Box<dyn ParagraphPreProcessor>;
}

pub trait ParagraphPreProcessor {
    /// Returns how many bytes of the paragraph's joined content were
    /// consumed from its start; 0 leaves the paragraph alone.
    fn pre_process(&mut self, paragraph: NodeId, cx: &mut PreProcessContext<'_>) -> usize;
}

pub trait BlockPreProcessorFactory: Dependent + Send + Sync {
    /// Categories of the blocks this pre-processor wants to visit.
    fn block_categories(&self) -> &[Category];

    fn create(&self, options: &ParserOptions) -> Box<dyn BlockPreProcessor>;
}

pub trait BlockPreProcessor {
    fn pre_process(&mut self, block: NodeId, cx: &mut PreProcessContext<'_>);
}

/// A resolved stage of block pre-processors and the union of the
/// categories they visit.
pub(crate) struct BlockStage {
    pub factories: Vec<Arc<dyn BlockPreProcessorFactory>>,
    pub categories: Vec<Category>,
}

impl BlockStage {
    pub(crate) fn new(stage: Stage<Arc<dyn BlockPreProcessorFactory>>) -> Self {
        let mut categories: Vec<Category> = stage
            .members
            .iter()
            .flat_map(|f| f.block_categories().iter().copied())
            .collect();
        categories.sort();
        categories.dedup();
        Self {
            factories: stage.members,
            categories,
        }
    }
}

/// Mutable view of the parse handed to pre-processors.
pub struct PreProcessContext<'a> {
    pub(crate) tree: &'a mut Tree,
    pub(crate) tracker: &'a mut BlockTracker,
    pub(crate) references: &'a mut ReferenceMap,
    pub(crate) source: &'a str,
    pub(crate) options: &'a ParserOptions,
}

impl PreProcessContext<'_> {
    pub fn tree(&self) -> &Tree {
        self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        self.tree
    }

    pub fn source(&self) -> &str {
        self.source
    }

    pub fn options(&self) -> &ParserOptions {
        self.options
    }

    pub fn references(&self) -> &ReferenceMap {
        self.references
    }

    pub fn references_mut(&mut self) -> &mut ReferenceMap {
        self.references
    }

    /// The block's content lines joined with `\n`.
    pub fn content(&self, node: NodeId) -> JoinedContent {
        JoinedContent::new(self.tree.lines(node), self.source)
    }

    /// Creates a block and places it right before `anchor`.
    pub fn insert_block_before(&mut self, anchor: NodeId, kind: NodeKind, span: Span) -> NodeId {
        let category = kind.category();
        let node = self.tree.new_node(kind, span);
        self.tree.insert_before(anchor, node);
        self.tracker.block_added(node, category);
        node
    }

    /// Detaches a block and everything inside it.
    pub fn remove_block(&mut self, node: NodeId) {
        self.tracker.block_removed_with_descendants(self.tree, node);
        self.tree.unlink(node);
    }

    pub fn is_tracked(&self, node: NodeId, category: Category) -> bool {
        self.tracker.contains(node, category)
    }
}

/// Each paragraph runs to its own fixpoint within a stage before the next
/// paragraph is visited. A single-member stage makes one pass.
pub(crate) fn run_paragraph_stages(
    stages: &[Stage<Arc<dyn ParagraphPreProcessorFactory>>],
    cx: &mut PreProcessContext<'_>,
) {
    for stage in stages {
        let mut processors: Vec<_> = stage.members.iter().map(|f| f.create(cx.options)).collect();
        for paragraph in cx.tracker.items(&[Category::Paragraph]) {
            loop {
                let mut changed = false;
                for processor in &mut processors {
                    if !cx.tracker.contains(paragraph, Category::Paragraph) {
                        break;
                    }
                    let consumed = processor.pre_process(paragraph, cx);
                    if consumed > 0 {
                        changed = true;
                        apply_consumed(cx, paragraph, consumed);
                    }
                }
                if !changed
                    || stage.len() < 2
                    || !cx.tracker.contains(paragraph, Category::Paragraph)
                {
                    break;
                }
            }
        }
    }
}

pub(crate) fn run_block_stages(stages: &[BlockStage], cx: &mut PreProcessContext<'_>) {
    for stage in stages {
        if !stage.categories.iter().any(|&c| cx.tracker.has_category(c)) {
            continue;
        }
        for factory in &stage.factories {
            let categories = factory.block_categories();
            let mut processor = factory.create(cx.options);
            for block in cx.tracker.items(categories) {
                if categories.iter().any(|&c| cx.tracker.contains(block, c)) {
                    processor.pre_process(block, cx);
                }
            }
        }
    }
}

/// Trims `consumed` bytes plus following whitespace off the front of a
/// paragraph, removing it when nothing is left.
fn apply_consumed(cx: &mut PreProcessContext<'_>, paragraph: NodeId, consumed: usize) {
    let content = cx.content(paragraph);
    let text = content.text();
    assert!(
        consumed <= text.len() && text.is_char_boundary(consumed),
        "pre-processor consumed {consumed} bytes of a {}-byte paragraph",
        text.len()
    );
    let rest = &text[consumed..];
    let at = consumed + (rest.len() - rest.trim_start().len());
    if at >= text.len() {
        trace!("paragraph {:?} fully consumed", paragraph);
        cx.remove_block(paragraph);
        return;
    }

    let (line, offset) = content
        .line_at(at)
        .expect("a non-empty paragraph has a line at every offset");
    let lines = cx.tree.lines_mut(paragraph);
    lines.drain(..line);
    lines[0].skip(offset);
    let start = lines[0].content.start;
    let span = cx.tree.span(paragraph);
    trace!("paragraph {:?} now starts at {start}", paragraph);
    cx.tree.set_span(paragraph, Span::new(start, span.end));
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::parsing::deps::FactoryId;
    use crate::parsing::{Parser, ParserBuilder};

    /// Consumes one leading `!` per call.
    struct Bang;

    impl Dependent for Bang {
        fn id(&self) -> FactoryId {
            FactoryId("test.bang")
        }
    }

    impl ParagraphPreProcessorFactory for Bang {
        fn create(&self, _options: &ParserOptions) -> Box<dyn ParagraphPreProcessor> {
            Box::new(BangProcessor)
        }
    }

    struct BangProcessor;

    impl ParagraphPreProcessor for BangProcessor {
        fn pre_process(&mut self, paragraph: NodeId, cx: &mut PreProcessContext<'_>) -> usize {
            usize::from(cx.content(paragraph).text().starts_with('!'))
        }
    }

    /// Does nothing; only there to make a stage of two.
    struct Idle;

    impl Dependent for Idle {
        fn id(&self) -> FactoryId {
            FactoryId("test.idle")
        }
    }

    impl ParagraphPreProcessorFactory for Idle {
        fn create(&self, _options: &ParserOptions) -> Box<dyn ParagraphPreProcessor> {
            Box::new(IdleProcessor)
        }
    }

    struct IdleProcessor;

    impl ParagraphPreProcessor for IdleProcessor {
        fn pre_process(&mut self, _paragraph: NodeId, _cx: &mut PreProcessContext<'_>) -> usize {
            0
        }
    }

    /// Records the paragraph text each time it runs.
    struct Record(Arc<Mutex<Vec<String>>>);

    impl Dependent for Record {
        fn id(&self) -> FactoryId {
            FactoryId("test.record")
        }
    }

    impl ParagraphPreProcessorFactory for Record {
        fn create(&self, _options: &ParserOptions) -> Box<dyn ParagraphPreProcessor> {
            Box::new(RecordProcessor(Arc::clone(&self.0)))
        }
    }

    struct RecordProcessor(Arc<Mutex<Vec<String>>>);

    impl ParagraphPreProcessor for RecordProcessor {
        fn pre_process(&mut self, paragraph: NodeId, cx: &mut PreProcessContext<'_>) -> usize {
            let text = cx.content(paragraph).text().to_string();
            self.0.lock().unwrap().push(text);
            0
        }
    }

    /// Reference definitions off, so the test pre-processors stage alone.
    fn builder() -> ParserBuilder {
        let options = ParserOptions {
            reference_definitions: false,
            ..ParserOptions::default()
        };
        ParserBuilder::new(options)
    }

    fn first_paragraph_text(parser: &Parser, input: &str) -> String {
        let doc = parser.parse(input);
        let para = doc.tree().children(doc.root())[0];
        doc.text(para)
    }

    #[test]
    fn single_member_stage_runs_once() {
        let mut builder = builder();
        builder.paragraph_pre_processor(Bang);
        let parser = builder.build().unwrap();
        assert_eq!(first_paragraph_text(&parser, "!!!x\n"), "!!x");
    }

    #[test]
    fn multi_member_stage_repeats_until_no_change() {
        let mut builder = builder();
        builder.paragraph_pre_processor(Bang).paragraph_pre_processor(Idle);
        let parser = builder.build().unwrap();
        assert_eq!(first_paragraph_text(&parser, "!!!x\n"), "x");
    }

    #[test]
    fn each_paragraph_settles_before_the_next() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut builder = builder();
        builder
            .paragraph_pre_processor(Bang)
            .paragraph_pre_processor(Record(Arc::clone(&seen)));
        let parser = builder.build().unwrap();
        parser.parse("!!a\n\n!b\n");
        assert_eq!(*seen.lock().unwrap(), vec!["!a", "a", "a", "b", "b"]);
    }

    #[test]
    fn consumed_paragraph_leaves_whitespace_behind() {
        let mut builder = builder();
        builder.paragraph_pre_processor(Bang);
        let parser = builder.build().unwrap();
        assert_eq!(first_paragraph_text(&parser, "!  a\nb\n"), "a\nb");
    }

    #[test]
    fn fully_consumed_paragraph_is_removed() {
        let mut builder = builder();
        builder.paragraph_pre_processor(Bang);
        let parser = builder.build().unwrap();
        let doc = parser.parse("!\n\nkept\n");
        let kinds: Vec<_> = doc
            .tree()
            .children(doc.root())
            .iter()
            .map(|&c| doc.tree().kind(c).name())
            .collect();
        assert_eq!(kinds, vec!["Paragraph"]);
        assert_eq!(doc.text(doc.tree().children(doc.root())[0]), "kept");
    }

    /// Removes every thematic break; counts how often it was created.
    struct DropBreaks {
        created: Arc<AtomicUsize>,
    }

    impl Dependent for DropBreaks {
        fn id(&self) -> FactoryId {
            FactoryId("test.drop_breaks")
        }
    }

    impl BlockPreProcessorFactory for DropBreaks {
        fn block_categories(&self) -> &[Category] {
            &[Category::ThematicBreak]
        }

        fn create(&self, _options: &ParserOptions) -> Box<dyn BlockPreProcessor> {
            self.created.fetch_add(1, Ordering::SeqCst);
            Box::new(DropBreaksProcessor)
        }
    }

    struct DropBreaksProcessor;

    impl BlockPreProcessor for DropBreaksProcessor {
        fn pre_process(&mut self, block: NodeId, cx: &mut PreProcessContext<'_>) {
            cx.remove_block(block);
        }
    }

    #[test]
    fn block_stage_visits_its_categories() {
        let created = Arc::new(AtomicUsize::new(0));
        let mut builder = builder();
        builder.block_pre_processor(DropBreaks {
            created: Arc::clone(&created),
        });
        let parser = builder.build().unwrap();

        let doc = parser.parse("a\n\n***\n\nb\n---\n");
        let kinds: Vec<_> = doc
            .tree()
            .children(doc.root())
            .iter()
            .map(|&c| doc.tree().kind(c).name())
            .collect();
        assert_eq!(kinds, vec!["Paragraph", "Heading"]);
        assert_eq!(created.load(Ordering::SeqCst), 1);

        parser.parse("no breaks here\n");
        assert_eq!(created.load(Ordering::SeqCst), 1);
    }
}
