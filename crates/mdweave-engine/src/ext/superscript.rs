use crate::parsing::config::{Extension, ParserBuilder};
use crate::parsing::inline::delimiters::{DelimiterMatch, DelimiterProcessor, DelimiterRun};
use crate::parsing::node::NodeKind;

/// `x^2^`, one caret per side.
pub struct SuperscriptDelimiterProcessor;

impl SuperscriptDelimiterProcessor {
    pub const CARET: char = '^';
}

impl DelimiterProcessor for SuperscriptDelimiterProcessor {
    fn character(&self) -> char {
        Self::CARET
    }

    fn delimiter_use(&self, _opener: &DelimiterRun, _closer: &DelimiterRun) -> usize {
        1
    }

    fn process(&self, pair: &mut DelimiterMatch<'_>, _used: usize) {
        pair.wrap(NodeKind::Superscript);
    }
}

pub struct SuperscriptExtension;

impl Extension for SuperscriptExtension {
    fn extend(&self, builder: &mut ParserBuilder) {
        builder.delimiter_processor(SuperscriptDelimiterProcessor);
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;
    use crate::options::ParserOptions;

    #[test]
    fn wraps_between_carets() {
        let parser = ParserBuilder::new(ParserOptions::default())
            .with_extension(&SuperscriptExtension)
            .build()
            .unwrap();
        assert_snapshot!(parser.parse("2^10^\n").outline(), @r#"
        Document [0..6]
          Paragraph [0..5]
            Text [0..1] "2"
            Superscript [1..5]
              Text [2..4] "10"
        "#);
    }
}
