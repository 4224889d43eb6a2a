use crate::parsing::inline::delimiters::{
    DelimiterMatch, DelimiterProcessor, DelimiterRun, RunFlags, flanking, is_punctuation,
};
use crate::parsing::node::NodeKind;

/// `*` and `_` emphasis: one character per side gives emphasis, two give
/// strong emphasis.
pub struct EmphasisDelimiterProcessor {
    ch: char,
}

impl EmphasisDelimiterProcessor {
    pub const STAR: char = '*';
    pub const UNDERSCORE: char = '_';

    pub fn star() -> Self {
        Self { ch: Self::STAR }
    }

    pub fn underscore() -> Self {
        Self {
            ch: Self::UNDERSCORE,
        }
    }
}

impl DelimiterProcessor for EmphasisDelimiterProcessor {
    fn character(&self) -> char {
        self.ch
    }

    /// `_` may not open or close inside a word.
    fn classify(&self, before: Option<char>, after: Option<char>) -> RunFlags {
        let f = flanking(before, after);
        if self.ch == Self::UNDERSCORE {
            RunFlags {
                can_open: f.left && (!f.right || before.is_some_and(is_punctuation)),
                can_close: f.right && (!f.left || after.is_some_and(is_punctuation)),
            }
        } else {
            RunFlags {
                can_open: f.left,
                can_close: f.right,
            }
        }
    }

    fn delimiter_use(&self, opener: &DelimiterRun, closer: &DelimiterRun) -> usize {
        // the rule of three for runs that can both open and close
        if (opener.can_close || closer.can_open)
            && (opener.original_len + closer.original_len) % 3 == 0
            && !(opener.original_len % 3 == 0 && closer.original_len % 3 == 0)
        {
            return 0;
        }
        if opener.len >= 2 && closer.len >= 2 { 2 } else { 1 }
    }

    fn process(&self, pair: &mut DelimiterMatch<'_>, used: usize) {
        let kind = if used == 2 {
            NodeKind::Strong
        } else {
            NodeKind::Emphasis
        };
        pair.wrap(kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(len: usize, can_open: bool, can_close: bool) -> DelimiterRun {
        DelimiterRun {
            ch: '*',
            len,
            original_len: len,
            can_open,
            can_close,
        }
    }

    #[test]
    fn strong_when_both_sides_have_two() {
        let p = EmphasisDelimiterProcessor::star();
        assert_eq!(p.delimiter_use(&run(2, true, false), &run(2, false, true)), 2);
        assert_eq!(p.delimiter_use(&run(3, true, false), &run(1, false, true)), 1);
    }

    #[test]
    fn rule_of_three_rejects_pair() {
        let p = EmphasisDelimiterProcessor::star();
        // `*foo**bar*`: the middle run can open and close, 1 + 2 == 3
        assert_eq!(p.delimiter_use(&run(1, true, false), &run(2, true, true)), 0);
    }

    #[test]
    fn underscore_is_not_intraword() {
        let p = EmphasisDelimiterProcessor::underscore();
        assert_eq!(
            p.classify(Some('a'), Some('b')),
            RunFlags {
                can_open: false,
                can_close: false
            }
        );
        let star = EmphasisDelimiterProcessor::star();
        assert_eq!(
            star.classify(Some('a'), Some('b')),
            RunFlags {
                can_open: true,
                can_close: true
            }
        );
    }
}
