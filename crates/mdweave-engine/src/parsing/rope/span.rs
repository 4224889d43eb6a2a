use serde::Serialize;

/// A byte range `[start, end)` into the source document.
///
/// Nodes store spans rather than copied text, so slicing the source with a
/// node's span reproduces exactly the characters it was parsed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Span {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// An empty span positioned at `offset`.
    pub const fn empty_at(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Returns the length in bytes. Uses saturating subtraction for safety.
    #[must_use]
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty (start >= end).
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// True when `other` lies entirely within this span.
    #[must_use]
    pub fn contains(self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Offsets both ends by `base`, turning a line-relative span absolute.
    #[must_use]
    pub fn shifted(self, base: usize) -> Span {
        Span::new(self.start + base, self.end + base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_saturates_on_inverted_span() {
        assert_eq!(Span::new(5, 3).len(), 0);
        assert!(Span::new(5, 3).is_empty());
    }

    #[test]
    fn contains_checks_both_ends() {
        let outer = Span::new(2, 10);
        assert!(outer.contains(Span::new(2, 10)));
        assert!(outer.contains(Span::empty_at(10)));
        assert!(!outer.contains(Span::new(1, 4)));
        assert!(!outer.contains(Span::new(9, 11)));
    }

    #[test]
    fn shifted_moves_both_offsets() {
        assert_eq!(Span::new(1, 3).shifted(10), Span::new(11, 13));
    }
}
