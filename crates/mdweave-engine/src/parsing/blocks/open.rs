use std::sync::Arc;

use crate::options::ParserOptions;

use super::kinds::{
    BlockQuoteFactory, FencedCodeFactory, HeadingFactory, HtmlBlockFactory, IndentedCodeFactory,
    ListFactory, ThematicBreakFactory,
};
use super::types::BlockParserFactory;

/// The built-in block factories enabled by `options`, in their fixed
/// relative order. Paragraphs need no factory: they open whenever nothing
/// else does.
pub fn builtin_block_factories(options: &ParserOptions) -> Vec<Arc<dyn BlockParserFactory>> {
    let blocks = &options.blocks;
    let candidates: [(bool, Arc<dyn BlockParserFactory>); 7] = [
        (blocks.block_quote, Arc::new(BlockQuoteFactory)),
        (blocks.heading, Arc::new(HeadingFactory)),
        (blocks.fenced_code, Arc::new(FencedCodeFactory)),
        (blocks.html_block, Arc::new(HtmlBlockFactory)),
        (blocks.thematic_break, Arc::new(ThematicBreakFactory)),
        (blocks.list, Arc::new(ListFactory)),
        (blocks.indented_code, Arc::new(IndentedCodeFactory)),
    ];
    candidates
        .into_iter()
        .filter_map(|(enabled, factory)| enabled.then_some(factory))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parsing::blocks::kinds::BUILTIN_ORDER;
    use crate::parsing::deps::{Dependent, FactoryId};

    fn ids(options: &ParserOptions) -> Vec<FactoryId> {
        builtin_block_factories(options)
            .iter()
            .map(|f| f.id())
            .collect()
    }

    #[test]
    fn all_enabled_by_default() {
        assert_eq!(ids(&ParserOptions::default()), BUILTIN_ORDER);
    }

    #[test]
    fn disabled_kinds_are_left_out() {
        let mut options = ParserOptions::default();
        options.blocks.fenced_code = false;
        options.blocks.list = false;
        assert_eq!(
            ids(&options),
            vec![
                BlockQuoteFactory::ID,
                HeadingFactory::ID,
                HtmlBlockFactory::ID,
                ThematicBreakFactory::ID,
                IndentedCodeFactory::ID,
            ]
        );
    }
}
