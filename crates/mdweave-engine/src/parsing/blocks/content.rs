//! Content lines collected by leaf blocks.
//!
//! A leaf block's text is not contiguous in the source: container prefixes
//! (`> `, list indentation) sit between its lines, and a tab that was only
//! partially consumed by a container contributes a few virtual spaces.
//! [`BlockLine`] records one line's content, and [`JoinedContent`] stitches
//! the lines into one string while keeping the way back to source offsets.

use std::borrow::Cow;

use crate::parsing::rope::span::Span;

/// One line's content within a leaf block.
///
/// # Invariants
///
/// - `content` lies within `raw_line`
/// - `tab_fill` is at most 4 (one tab stop)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLine {
    /// Full physical line span, terminator included.
    pub raw_line: Span,
    /// Remainder after container prefixes, terminator excluded.
    pub content: Span,
    /// Virtual spaces standing in for the unconsumed part of a tab that
    /// precedes `content`.
    pub tab_fill: usize,
}

impl BlockLine {
    /// The line's text with tab fill expanded.
    pub fn text<'s>(&self, source: &'s str) -> Cow<'s, str> {
        let content = &source[self.content.start..self.content.end];
        if self.tab_fill == 0 {
            Cow::Borrowed(content)
        } else {
            let mut s = " ".repeat(self.tab_fill);
            s.push_str(content);
            Cow::Owned(s)
        }
    }

    pub fn is_blank(&self, source: &str) -> bool {
        source[self.content.start..self.content.end]
            .bytes()
            .all(|b| b == b' ' || b == b'\t')
    }

    /// Drops the first `n` bytes of the expanded text.
    pub(crate) fn skip(&mut self, n: usize) {
        let from_fill = n.min(self.tab_fill);
        self.tab_fill -= from_fill;
        let rest = n - from_fill;
        assert!(
            self.content.start + rest <= self.content.end,
            "cannot skip {n} bytes of a {}-byte line",
            self.tab_fill + from_fill + self.content.len()
        );
        self.content.start += rest;
    }
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    offset: usize,
    fill: usize,
    source: Span,
}

/// A leaf block's lines joined with `\n`, with a map from offsets in the
/// joined text back to source offsets.
#[derive(Debug, Clone)]
pub struct JoinedContent {
    text: String,
    segments: Vec<Segment>,
}

impl JoinedContent {
    pub fn new(lines: &[BlockLine], source: &str) -> Self {
        let mut text = String::new();
        let mut segments = Vec::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                text.push('\n');
            }
            segments.push(Segment {
                offset: text.len(),
                fill: line.tab_fill,
                source: line.content,
            });
            text.push_str(&line.text(source));
        }
        Self { text, segments }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Index of the line holding `offset`, and the offset within that line.
    /// The `\n` after a line counts as the end of that line.
    pub fn line_at(&self, offset: usize) -> Option<(usize, usize)> {
        let idx = self
            .segments
            .partition_point(|s| s.offset <= offset)
            .checked_sub(1)?;
        Some((idx, offset - self.segments[idx].offset))
    }

    /// Source offset of a byte in the joined text. Virtual tab fill maps to
    /// the start of the line's content, the joining `\n` to its end.
    pub fn to_source(&self, offset: usize) -> usize {
        let Some((idx, local)) = self.line_at(offset) else {
            return self.segments.first().map_or(0, |s| s.source.start);
        };
        let seg = self.segments[idx];
        if local <= seg.fill {
            seg.source.start
        } else {
            (seg.source.start + local - seg.fill).min(seg.source.end)
        }
    }

    pub fn span_to_source(&self, start: usize, end: usize) -> Span {
        Span::new(self.to_source(start), self.to_source(end))
    }
}
