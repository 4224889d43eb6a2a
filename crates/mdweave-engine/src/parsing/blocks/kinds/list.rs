use crate::parsing::blocks::cursor::columns_to_next_tab_stop;
use crate::parsing::blocks::types::{
    BlockContinue, BlockParser, BlockParserFactory, BlockStart, CloseContext, MatchedBlock,
    ParserState, StartedBlock,
};
use crate::parsing::deps::{Dependent, FactoryId};
use crate::parsing::node::{ListMarker, NodeKind};
use crate::parsing::tree::NodeId;

use super::BUILTIN_ORDER;

/// A list item marker found at the start of a line remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMarkerParse {
    pub marker: ListMarker,
    /// Bytes taken by the marker itself.
    pub len: usize,
}

impl ListMarkerParse {
    pub const BULLETS: [u8; 3] = [b'-', b'+', b'*'];
    const MAX_DIGITS: usize = 9;

    /// Parses `-`, `+`, `*`, or up to nine digits followed by `.` or `)`.
    /// The marker must be followed by whitespace or the end of the line.
    pub fn parse(rest: &str) -> Option<Self> {
        let bytes = rest.as_bytes();
        let first = *bytes.first()?;
        let parsed = if Self::BULLETS.contains(&first) {
            ListMarkerParse {
                marker: ListMarker::Bullet(first as char),
                len: 1,
            }
        } else {
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            if digits == 0 || digits > Self::MAX_DIGITS {
                return None;
            }
            let delimiter = *bytes.get(digits)?;
            if delimiter != b'.' && delimiter != b')' {
                return None;
            }
            let start = rest[..digits].parse().ok()?;
            ListMarkerParse {
                marker: ListMarker::Ordered {
                    start,
                    delimiter: delimiter as char,
                },
                len: digits + 1,
            }
        };
        match bytes.get(parsed.len) {
            None | Some(b' ' | b'\t') => Some(parsed),
            _ => None,
        }
    }
}

pub struct ListFactory;

impl ListFactory {
    pub const ID: FactoryId = FactoryId("core.list");
    /// Whitespace after the marker beyond this many columns is content.
    const MAX_PADDING: usize = 4;
}

impl Dependent for ListFactory {
    fn id(&self) -> FactoryId {
        Self::ID
    }

    fn after(&self) -> &[FactoryId] {
        &BUILTIN_ORDER[..5]
    }
}

impl BlockParserFactory for ListFactory {
    fn try_start(&self, state: &ParserState<'_>, matched: &MatchedBlock<'_>) -> Option<BlockStart> {
        let in_list = matches!(matched.kind(), NodeKind::List { .. });
        if state.indent() >= state.code_block_indent() && !in_list {
            return None;
        }
        let parsed = ListMarkerParse::parse(state.rest())?;

        // measure the whitespace after the marker in columns
        let marker_end = state.next_non_space() + parsed.len;
        let marker_column = state.next_non_space_column() + parsed.len;
        let mut index = marker_end;
        let mut column = marker_column;
        while let Some(b) = state.byte_at(index) {
            match b {
                b' ' => column += 1,
                b'\t' => column += columns_to_next_tab_stop(column),
                _ => break,
            }
            index += 1;
        }
        let spaces = column - marker_column;
        let blank_item = index >= state.line().len();

        if matched.is_paragraph() {
            if blank_item {
                return None;
            }
            if let ListMarker::Ordered { start, .. } = parsed.marker {
                if start != 1 {
                    return None;
                }
            }
        }

        let padding = if blank_item || spaces > Self::MAX_PADDING {
            parsed.len + 1
        } else {
            parsed.len + spaces
        };
        let item = StartedBlock::new(
            NodeKind::ListItem {
                marker: parsed.marker,
            },
            ListItemParser {
                content_offset: state.indent() + padding,
            },
        );
        let blocks = match matched.kind() {
            NodeKind::List { marker, .. } if marker.same_list(parsed.marker) => vec![item],
            _ => vec![
                StartedBlock::new(
                    NodeKind::List {
                        marker: parsed.marker,
                        tight: true,
                    },
                    ListParser,
                ),
                item,
            ],
        };
        Some(BlockStart::nested(blocks).at_column(state.next_non_space_column() + padding))
    }
}

/// Lists continue on every line; it is their items that end them.
struct ListParser;

impl BlockParser for ListParser {
    fn try_continue(&mut self, _state: &ParserState<'_>, _block: NodeId) -> BlockContinue {
        BlockContinue::Continue
    }

    /// A list is loose when a blank line separates two of its items or two
    /// blocks directly inside one item.
    fn close_block(&mut self, cx: &mut CloseContext<'_>) {
        let list = cx.node();
        let items: Vec<NodeId> = cx
            .tree()
            .children(list)
            .iter()
            .copied()
            .filter(|&c| matches!(cx.tree().kind(c), NodeKind::ListItem { .. }))
            .collect();

        let mut tight = true;
        'items: for (i, &item) in items.iter().enumerate() {
            let last_item = i + 1 == items.len();
            if cx.ends_with_blank_line(item) && !last_item {
                tight = false;
                break;
            }
            let kids: Vec<NodeId> = cx
                .tree()
                .children(item)
                .iter()
                .copied()
                .filter(|&c| !matches!(cx.tree().kind(c), NodeKind::BlankLine))
                .collect();
            for (j, &kid) in kids.iter().enumerate() {
                let last_kid = j + 1 == kids.len();
                if cx.ends_with_blank_line(kid) && !(last_item && last_kid) {
                    tight = false;
                    break 'items;
                }
            }
        }

        if let NodeKind::List { tight: slot, .. } = &mut cx.tree_mut().node_mut(list).kind {
            *slot = tight;
        }
    }
}

struct ListItemParser {
    /// Columns from the item's container edge to its content.
    content_offset: usize,
}

impl BlockParser for ListItemParser {
    fn try_continue(&mut self, state: &ParserState<'_>, block: NodeId) -> BlockContinue {
        if state.is_blank() {
            // an item may begin with at most one blank line
            if state.tree().first_content_child(block).is_none() {
                BlockContinue::None
            } else {
                BlockContinue::AtIndex(state.next_non_space())
            }
        } else if state.indent() >= self.content_offset {
            BlockContinue::AtColumn(state.column() + self.content_offset)
        } else {
            BlockContinue::None
        }
    }
}
