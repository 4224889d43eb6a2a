//! Pluggable delimiter runs.
//!
//! A delimiter run is a sequence of one repeated character, such as `**` or
//! `~~`. Each character is owned by one [`DelimiterProcessor`], which
//! decides how a run may be used, how many characters an opener/closer pair
//! consumes, and what node the pair produces. Pairing follows the usual
//! stack discipline: each closer looks back for the nearest compatible
//! opener.

use crate::parsing::node::NodeKind;
use crate::parsing::rope::Span;
use crate::parsing::tree::{NodeId, Tree};

/// What a run may do, derived from the characters around it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunFlags {
    pub can_open: bool,
    pub can_close: bool,
}

/// Left- and right-flanking status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flanking {
    pub left: bool,
    pub right: bool,
}

/// Unicode-ish punctuation test used by the flanking rules.
pub fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || (!c.is_alphanumeric() && !c.is_whitespace() && !c.is_control() && !c.is_ascii())
}

/// Computes flanking from the chars on either side of a run. A missing
/// neighbour (start or end of the text) counts as whitespace.
pub fn flanking(before: Option<char>, after: Option<char>) -> Flanking {
    let before_ws = before.is_none_or(char::is_whitespace);
    let after_ws = after.is_none_or(char::is_whitespace);
    let before_punct = before.is_some_and(is_punctuation);
    let after_punct = after.is_some_and(is_punctuation);
    Flanking {
        left: !after_ws && (!after_punct || before_ws || before_punct),
        right: !before_ws && (!before_punct || after_ws || after_punct),
    }
}

/// A run as seen by its processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterRun {
    pub ch: char,
    /// Characters not yet consumed by a pairing.
    pub len: usize,
    pub original_len: usize,
    pub can_open: bool,
    pub can_close: bool,
}

pub trait DelimiterProcessor: Send + Sync {
    fn character(&self) -> char;

    /// Runs shorter than this stay literal text.
    fn min_length(&self) -> usize {
        1
    }

    /// Whether a run may open or close, given its neighbouring chars.
    fn classify(&self, before: Option<char>, after: Option<char>) -> RunFlags {
        let f = flanking(before, after);
        RunFlags {
            can_open: f.left,
            can_close: f.right,
        }
    }

    /// How many characters to consume from each side; 0 rejects the pair.
    fn delimiter_use(&self, opener: &DelimiterRun, closer: &DelimiterRun) -> usize;

    /// Builds the node for a pair that consumed `used` characters.
    fn process(&self, pair: &mut DelimiterMatch<'_>, used: usize);
}

/// An opener/closer pair being turned into a node. The consumed delimiter
/// characters have already been trimmed from the runs' text nodes.
pub struct DelimiterMatch<'a> {
    pub(crate) tree: &'a mut Tree,
    pub(crate) opener: NodeId,
    pub(crate) closer: NodeId,
    pub(crate) span: Span,
}

impl DelimiterMatch<'_> {
    /// Source span from the first consumed opener char to the last consumed
    /// closer char.
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn tree(&self) -> &Tree {
        self.tree
    }

    /// Wraps everything between the opener and closer in a new node of
    /// `kind`, placed directly after the opener.
    pub fn wrap(&mut self, kind: NodeKind) -> NodeId {
        let wrapper = self.tree.new_node(kind, self.span);
        let mut between = Vec::new();
        let mut next = self.tree.next_sibling(self.opener);
        while let Some(id) = next {
            if id == self.closer {
                break;
            }
            between.push(id);
            next = self.tree.next_sibling(id);
        }
        self.tree.insert_after(self.opener, wrapper);
        for id in between {
            self.tree.append_child(wrapper, id);
        }
        wrapper
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(None, Some('a'), true, false)]
    #[case(Some('a'), None, false, true)]
    #[case(Some('a'), Some('b'), true, true)]
    #[case(Some(' '), Some(' '), false, false)]
    #[case(Some(' '), Some('.'), true, false)]
    #[case(Some('a'), Some('.'), false, true)]
    #[case(Some('.'), Some('a'), true, false)]
    fn flanking_rules(
        #[case] before: Option<char>,
        #[case] after: Option<char>,
        #[case] left: bool,
        #[case] right: bool,
    ) {
        assert_eq!(flanking(before, after), Flanking { left, right });
    }

    #[test]
    fn wrap_moves_nodes_between_pair() {
        let mut tree = Tree::new();
        let para = tree.new_node(NodeKind::Paragraph, Span::new(0, 7));
        let ids: Vec<_> = [(0, 1), (1, 2), (2, 3), (3, 4)]
            .iter()
            .map(|&(s, e)| {
                let id = tree.new_node(NodeKind::Text, Span::new(s, e));
                tree.append_child(para, id);
                id
            })
            .collect();
        let mut pair = DelimiterMatch {
            tree: &mut tree,
            opener: ids[0],
            closer: ids[3],
            span: Span::new(0, 4),
        };
        let wrapper = pair.wrap(NodeKind::Emphasis);
        assert_eq!(tree.children(para), &[ids[0], wrapper, ids[3]]);
        assert_eq!(tree.children(wrapper), &[ids[1], ids[2]]);
    }
}
