//! Parser construction.
//!
//! A [`ParserBuilder`] collects options and extension registrations, then
//! [`ParserBuilder::build`] resolves every ordering constraint once into an
//! immutable [`ParserConfig`]. Configuration errors surface here, never
//! while parsing.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::error::ConfigError;
use crate::options::ParserOptions;

use super::blocks::builtin_block_factories;
use super::blocks::types::BlockParserFactory;
use super::deps::{Dependent, Stage, flatten, resolve};
use super::document::Document;
use super::inline::delimiters::DelimiterProcessor;
use super::inline::kinds::EmphasisDelimiterProcessor;
use super::inline::types::InlineParserExtension;
use super::preprocess::{
    BlockPreProcessorFactory, BlockStage, ParagraphPreProcessorFactory,
    ReferencePreProcessorFactory,
};
use super::Parser;

/// Runs once per document after inline parsing.
pub trait DocumentHook: Send + Sync {
    fn finalize_document(&self, document: &mut Document);
}

/// A bundle of registrations, applied to a builder in one call.
pub trait Extension {
    fn extend(&self, builder: &mut ParserBuilder);
}

/// Everything a parse needs, resolved and frozen.
pub struct ParserConfig {
    pub(crate) options: ParserOptions,
    /// Block factories in probing order: extensions ahead of built-ins.
    pub(crate) block_factories: Vec<Arc<dyn BlockParserFactory>>,
    pub(crate) paragraph_stages: Vec<Stage<Arc<dyn ParagraphPreProcessorFactory>>>,
    pub(crate) block_stages: Vec<BlockStage>,
    pub(crate) delimiters: HashMap<char, Arc<dyn DelimiterProcessor>>,
    pub(crate) inline_extensions: Vec<Arc<dyn InlineParserExtension>>,
    pub(crate) document_hooks: Vec<Arc<dyn DocumentHook>>,
}

impl ParserConfig {
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }
}

pub struct ParserBuilder {
    options: ParserOptions,
    block_factories: Vec<Arc<dyn BlockParserFactory>>,
    paragraph_pre_processors: Vec<Arc<dyn ParagraphPreProcessorFactory>>,
    block_pre_processors: Vec<Arc<dyn BlockPreProcessorFactory>>,
    delimiters: Vec<Arc<dyn DelimiterProcessor>>,
    inline_extensions: Vec<Arc<dyn InlineParserExtension>>,
    document_hooks: Vec<Arc<dyn DocumentHook>>,
}

impl ParserBuilder {
    pub fn new(options: ParserOptions) -> Self {
        Self {
            options,
            block_factories: Vec::new(),
            paragraph_pre_processors: Vec::new(),
            block_pre_processors: Vec::new(),
            delimiters: Vec::new(),
            inline_extensions: Vec::new(),
            document_hooks: Vec::new(),
        }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn with_extension<E: Extension + ?Sized>(mut self, extension: &E) -> Self {
        extension.extend(&mut self);
        self
    }

    pub fn block_parser_factory(
        &mut self,
        factory: impl BlockParserFactory + 'static,
    ) -> &mut Self {
        self.block_factories.push(Arc::new(factory));
        self
    }

    pub fn paragraph_pre_processor(
        &mut self,
        factory: impl ParagraphPreProcessorFactory + 'static,
    ) -> &mut Self {
        self.paragraph_pre_processors.push(Arc::new(factory));
        self
    }

    pub fn block_pre_processor(
        &mut self,
        factory: impl BlockPreProcessorFactory + 'static,
    ) -> &mut Self {
        self.block_pre_processors.push(Arc::new(factory));
        self
    }

    /// Registers the processor for its character. A registered processor
    /// for `*` or `_` replaces the built-in emphasis.
    pub fn delimiter_processor(&mut self, processor: impl DelimiterProcessor + 'static) -> &mut Self {
        self.delimiters.push(Arc::new(processor));
        self
    }

    pub fn inline_extension(
        &mut self,
        extension: impl InlineParserExtension + 'static,
    ) -> &mut Self {
        self.inline_extensions.push(Arc::new(extension));
        self
    }

    pub fn document_hook(&mut self, hook: impl DocumentHook + 'static) -> &mut Self {
        self.document_hooks.push(Arc::new(hook));
        self
    }

    pub fn build(self) -> Result<Parser, ConfigError> {
        let ParserBuilder {
            options,
            mut block_factories,
            mut paragraph_pre_processors,
            block_pre_processors,
            delimiters,
            inline_extensions,
            document_hooks,
        } = self;

        block_factories.extend(builtin_block_factories(&options));
        let block_factories = flatten(resolve(block_factories)?);
        debug!(
            "block factories: {:?}",
            block_factories.iter().map(|f| f.id().0).collect::<Vec<_>>()
        );

        if options.reference_definitions {
            paragraph_pre_processors.push(Arc::new(ReferencePreProcessorFactory));
        }
        let paragraph_stages = resolve(paragraph_pre_processors)?;
        debug!("{} paragraph pre-processing stages", paragraph_stages.len());

        let block_stages: Vec<BlockStage> = resolve(block_pre_processors)?
            .into_iter()
            .map(BlockStage::new)
            .collect();
        debug!("{} block pre-processing stages", block_stages.len());

        let mut delimiter_map: HashMap<char, Arc<dyn DelimiterProcessor>> = HashMap::new();
        for processor in delimiters {
            let ch = processor.character();
            if delimiter_map.insert(ch, processor).is_some() {
                return Err(ConfigError::DuplicateDelimiter(ch));
            }
        }
        let core: [Arc<dyn DelimiterProcessor>; 2] = [
            Arc::new(EmphasisDelimiterProcessor::star()),
            Arc::new(EmphasisDelimiterProcessor::underscore()),
        ];
        for processor in core {
            delimiter_map.entry(processor.character()).or_insert(processor);
        }

        Ok(Parser {
            config: Arc::new(ParserConfig {
                options,
                block_factories,
                paragraph_stages,
                block_stages,
                delimiters: delimiter_map,
                inline_extensions,
                document_hooks,
            }),
        })
    }
}
