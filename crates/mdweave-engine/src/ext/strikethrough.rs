use crate::parsing::config::{Extension, ParserBuilder};
use crate::parsing::inline::delimiters::{DelimiterMatch, DelimiterProcessor, DelimiterRun};
use crate::parsing::node::NodeKind;

/// `~~text~~`. Pairs always consume exactly two tildes per side, so longer
/// runs leave the surplus as literal text.
pub struct StrikethroughDelimiterProcessor;

impl StrikethroughDelimiterProcessor {
    pub const TILDE: char = '~';
}

impl DelimiterProcessor for StrikethroughDelimiterProcessor {
    fn character(&self) -> char {
        Self::TILDE
    }

    fn min_length(&self) -> usize {
        2
    }

    fn delimiter_use(&self, opener: &DelimiterRun, closer: &DelimiterRun) -> usize {
        if opener.len >= 2 && closer.len >= 2 { 2 } else { 0 }
    }

    fn process(&self, pair: &mut DelimiterMatch<'_>, _used: usize) {
        pair.wrap(NodeKind::Strikethrough);
    }
}

pub struct StrikethroughExtension;

impl Extension for StrikethroughExtension {
    fn extend(&self, builder: &mut ParserBuilder) {
        builder.delimiter_processor(StrikethroughDelimiterProcessor);
    }
}
