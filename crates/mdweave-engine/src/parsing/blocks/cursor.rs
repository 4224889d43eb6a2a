//! Position within the line currently being incorporated.
//!
//! The cursor tracks a byte index and a visual column. Tabs advance the
//! column to the next multiple of [`TAB_STOP`]; when a caller asks for a
//! column that falls inside a tab, the cursor stays on the tab and records
//! that the tab is partially consumed.

use crate::parsing::rope::{LineRef, Span};

use super::content::BlockLine;

pub const TAB_STOP: usize = 4;

/// Columns from `column` to the next tab stop.
pub fn columns_to_next_tab_stop(column: usize) -> usize {
    TAB_STOP - (column % TAB_STOP)
}

#[derive(Debug, Clone)]
pub struct LineCursor<'s> {
    /// Line text without its terminator.
    text: &'s str,
    line: LineRef,
    index: usize,
    column: usize,
    column_in_tab: bool,
    next_non_space: usize,
    next_non_space_column: usize,
    indent: usize,
    blank: bool,
}

impl<'s> LineCursor<'s> {
    /// `text` must be the line's content, i.e. `source[line.content()]`.
    pub fn new(text: &'s str, line: LineRef) -> Self {
        debug_assert_eq!(text.len(), line.content().len());
        Self {
            text,
            line,
            index: 0,
            column: 0,
            column_in_tab: false,
            next_non_space: 0,
            next_non_space_column: 0,
            indent: 0,
            blank: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(
            "",
            LineRef {
                span: Span::default(),
                eol: 0,
            },
        )
    }

    pub fn text(&self) -> &'s str {
        self.text
    }

    pub fn line(&self) -> LineRef {
        self.line
    }

    /// Absolute source offset of the line's first byte.
    pub fn line_start(&self) -> usize {
        self.line.span.start
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn column_in_tab(&self) -> bool {
        self.column_in_tab
    }

    pub fn next_non_space(&self) -> usize {
        self.next_non_space
    }

    pub fn next_non_space_column(&self) -> usize {
        self.next_non_space_column
    }

    /// Columns between the cursor and the next non-space character.
    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Nothing but spaces and tabs remains after the cursor.
    pub fn is_blank(&self) -> bool {
        self.blank
    }

    pub fn byte_at(&self, index: usize) -> Option<u8> {
        self.text.as_bytes().get(index).copied()
    }

    /// Scans forward from the cursor for the first non-space character.
    pub fn find_next_non_space(&mut self) {
        let bytes = self.text.as_bytes();
        let mut i = self.index;
        let mut cols = self.column;
        self.blank = true;
        while let Some(&b) = bytes.get(i) {
            match b {
                b' ' => {
                    i += 1;
                    cols += 1;
                }
                b'\t' => {
                    i += 1;
                    cols += columns_to_next_tab_stop(cols);
                }
                _ => {
                    self.blank = false;
                    break;
                }
            }
        }
        self.next_non_space = i;
        self.next_non_space_column = cols;
        self.indent = cols - self.column;
    }

    /// Moves to byte `index`, updating the column on the way.
    pub fn advance_to_index(&mut self, index: usize) {
        if index >= self.next_non_space && self.index <= self.next_non_space {
            self.index = self.next_non_space;
            self.column = self.next_non_space_column;
        }
        let len = self.text.len();
        while self.index < index && self.index != len {
            self.advance();
        }
        self.column_in_tab = false;
    }

    /// Moves to visual `column`. Landing inside a tab leaves the cursor on
    /// the tab with [`column_in_tab`](Self::column_in_tab) set.
    pub fn advance_to_column(&mut self, column: usize) {
        if column >= self.next_non_space_column && self.index <= self.next_non_space {
            self.index = self.next_non_space;
            self.column = self.next_non_space_column;
        }
        let len = self.text.len();
        let mut advanced = false;
        while self.column < column && self.index != len {
            self.advance();
            advanced = true;
        }
        if advanced && self.column > column {
            // only a tab can overshoot
            self.index -= 1;
            self.column = column;
            self.column_in_tab = true;
        } else {
            self.column_in_tab = false;
        }
    }

    fn advance(&mut self) {
        match self.text.as_bytes()[self.index] {
            b'\t' => {
                self.index += 1;
                self.column += columns_to_next_tab_stop(self.column);
            }
            _ => {
                // step over the whole char so the index stays on a boundary
                let ch_len = self.text[self.index..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
                self.index += ch_len;
                self.column += 1;
            }
        }
    }

    /// The rest of the line from the cursor, as a content line.
    pub fn content_line(&self) -> BlockLine {
        let base = self.line_start();
        let (start, tab_fill) = if self.column_in_tab {
            (self.index + 1, columns_to_next_tab_stop(self.column))
        } else {
            (self.index, 0)
        };
        BlockLine {
            raw_line: self.line.span,
            content: Span::new(base + start.min(self.text.len()), base + self.text.len()),
            tab_fill,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parsing::rope::lines_with_spans;

    fn cursor(text: &str) -> LineCursor<'_> {
        let line = lines_with_spans(text).next().unwrap();
        LineCursor::new(&text[line.content().start..line.content().end], line)
    }

    #[test]
    fn tab_advances_to_next_stop() {
        let mut cur = cursor("a\tb");
        cur.find_next_non_space();
        cur.advance_to_index(2);
        assert_eq!(cur.column(), 4);
        assert_eq!(cur.byte_at(cur.index()), Some(b'b'));
    }

    #[test]
    fn next_non_space_measures_indent_in_columns() {
        let mut cur = cursor(" \t x");
        cur.find_next_non_space();
        assert_eq!(cur.next_non_space(), 3);
        assert_eq!(cur.next_non_space_column(), 5);
        assert_eq!(cur.indent(), 5);
        assert!(!cur.is_blank());
    }

    #[test]
    fn blank_line_detection() {
        let mut cur = cursor("  \t\n");
        cur.find_next_non_space();
        assert!(cur.is_blank());
    }

    #[test]
    fn column_inside_tab_marks_partial_consumption() {
        let mut cur = cursor("\tfoo");
        cur.find_next_non_space();
        cur.advance_to_column(2);
        assert_eq!(cur.index(), 0);
        assert_eq!(cur.column(), 2);
        assert!(cur.column_in_tab());

        let line = cur.content_line();
        assert_eq!(line.tab_fill, 2);
        assert_eq!(line.text("\tfoo"), "  foo");
    }

    #[test]
    fn column_on_tab_stop_is_not_partial() {
        let mut cur = cursor("\tfoo");
        cur.find_next_non_space();
        cur.advance_to_column(4);
        assert_eq!(cur.index(), 1);
        assert!(!cur.column_in_tab());
    }

    #[test]
    fn continuing_from_a_partial_tab() {
        let mut cur = cursor(">\t\tfoo");
        cur.find_next_non_space();
        cur.advance_to_column(2);
        assert!(cur.column_in_tab());

        cur.find_next_non_space();
        assert_eq!(cur.indent(), 6);
        cur.advance_to_column(6);
        assert_eq!(cur.index(), 2);
        assert!(cur.column_in_tab());
        assert_eq!(cur.content_line().text(">\t\tfoo"), "  foo");
    }

    #[test]
    fn advancing_past_end_stops_at_end() {
        let mut cur = cursor("ab");
        cur.find_next_non_space();
        cur.advance_to_index(10);
        assert_eq!(cur.index(), 2);
        assert!(cur.content_line().content.is_empty());
    }

    #[test]
    fn multibyte_chars_count_one_column() {
        let mut cur = cursor("é\tx");
        cur.find_next_non_space();
        cur.advance_to_index(3);
        assert_eq!(cur.column(), 4);
    }
}
