use log::trace;

use crate::parsing::blocks::content::JoinedContent;
use crate::parsing::config::ParserConfig;
use crate::parsing::document::ReferenceMap;
use crate::parsing::node::NodeKind;
use crate::parsing::rope::Span;
use crate::parsing::tree::{NodeId, Tree};

use super::cursor::Cursor;
use super::delimiters::{DelimiterMatch, DelimiterRun};
use super::kinds::{CodeSpan, LinkSyntax, normalize_label};
use super::types::InlineContext;

struct Delimiter {
    run: DelimiterRun,
    node: NodeId,
}

struct Bracket {
    /// Text node holding the `[`.
    node: NodeId,
    pos: usize,
    /// Delimiters pushed before this bracket.
    delimiter_bottom: usize,
    /// Cleared once a link closes, since links do not nest.
    active: bool,
}

/// Parses the inline content of `block`, appending inline nodes as its
/// children.
///
/// Raw zones win: code spans are taken whole, and extensions are tried
/// before any built-in handling of their trigger character. Delimiter runs
/// and brackets become text nodes first and are paired afterwards, so an
/// unpaired run simply stays text.
pub(crate) fn parse_inlines(
    config: &ParserConfig,
    references: &ReferenceMap,
    tree: &mut Tree,
    block: NodeId,
    source: &str,
) {
    let content = JoinedContent::new(tree.lines(block), source);
    let mut parser = InlineParser {
        config,
        references,
        content: &content,
        tree,
        block,
        delimiters: Vec::new(),
        brackets: Vec::new(),
    };
    parser.run();
}

struct InlineParser<'a> {
    config: &'a ParserConfig,
    references: &'a ReferenceMap,
    content: &'a JoinedContent,
    tree: &'a mut Tree,
    block: NodeId,
    delimiters: Vec<Delimiter>,
    brackets: Vec<Bracket>,
}

impl InlineParser<'_> {
    fn run(&mut self) {
        let full = self.content.text();
        let s = full.trim_end();
        let mut cur = Cursor::new(s);
        let mut text_start = 0;

        'scan: while let Some(c) = cur.peek_char() {
            let pos = cur.pos();

            if c != '\n' {
                for ext in self.config.inline_extensions.iter().filter(|e| e.trigger() == c) {
                    let cx = InlineContext {
                        content: self.content,
                        pos,
                    };
                    if let Some(m) = ext.parse(&cx) {
                        if m.len > 0 && pos + m.len <= s.len() && s.is_char_boundary(pos + m.len) {
                            self.push_text(text_start, pos);
                            self.push_node(m.kind, pos, pos + m.len);
                            cur.i = pos + m.len;
                            text_start = cur.pos();
                            continue 'scan;
                        }
                    }
                }
            }

            match c {
                '\n' => {
                    let line = &s[text_start..pos];
                    let trimmed = line.trim_end_matches(' ');
                    let text_end = text_start + trimmed.len();
                    self.push_text(text_start, text_end);
                    let kind = if line.len() - trimmed.len() >= 2 {
                        NodeKind::HardBreak
                    } else {
                        NodeKind::SoftBreak
                    };
                    cur.bump();
                    cur.bump_while(b' ');
                    self.push_node(kind, text_end, cur.pos());
                    text_start = cur.pos();
                }
                '\\' => match s[pos + 1..].chars().next() {
                    Some('\n') => {
                        self.push_text(text_start, pos);
                        cur.bump_n(2);
                        cur.bump_while(b' ');
                        self.push_node(NodeKind::HardBreak, pos, cur.pos());
                        text_start = cur.pos();
                    }
                    Some(next) if next.is_ascii_punctuation() => {
                        // the escaped char becomes its own literal text
                        self.push_text(text_start, pos);
                        self.push_text(pos + 1, pos + 2);
                        cur.bump_n(2);
                        text_start = cur.pos();
                    }
                    _ => {
                        cur.bump();
                    }
                },
                '`' => {
                    let run = cur.bump_while(CodeSpan::TICK);
                    if let Some((inner_start, inner_end, total)) = CodeSpan::scan(&s[pos..], run) {
                        self.push_text(text_start, pos);
                        let inner = self.content.span_to_source(pos + inner_start, pos + inner_end);
                        self.push_node(NodeKind::CodeSpan { inner }, pos, pos + total);
                        cur.i = pos + total;
                        text_start = cur.pos();
                    }
                }
                '[' => {
                    self.push_text(text_start, pos);
                    let node = self.push_node(NodeKind::Text, pos, pos + 1);
                    self.brackets.push(Bracket {
                        node,
                        pos,
                        delimiter_bottom: self.delimiters.len(),
                        active: true,
                    });
                    cur.bump();
                    text_start = cur.pos();
                }
                ']' => {
                    self.push_text(text_start, pos);
                    cur.bump();
                    text_start = self.close_bracket(s, pos, &mut cur);
                }
                _ if self.config.delimiters.contains_key(&c) => {
                    self.push_text(text_start, pos);
                    self.push_delimiter_run(s, c, &mut cur);
                    text_start = cur.pos();
                }
                _ => {
                    cur.bump();
                }
            }
        }

        self.push_text(text_start, s.len());
        self.process_delimiters(0);
    }

    fn push_node(&mut self, kind: NodeKind, start: usize, end: usize) -> NodeId {
        let span = self.content.span_to_source(start, end);
        let id = self.tree.new_node(kind, span);
        self.tree.append_child(self.block, id);
        id
    }

    fn push_text(&mut self, start: usize, end: usize) {
        if end > start {
            self.push_node(NodeKind::Text, start, end);
        }
    }

    fn push_delimiter_run(&mut self, s: &str, ch: char, cur: &mut Cursor<'_>) {
        let config = self.config;
        let pos = cur.pos();
        let before = cur.prev_char();
        let mut count = 0;
        while cur.peek_char() == Some(ch) {
            cur.bump();
            count += 1;
        }
        let after = s[cur.pos()..].chars().next();
        let node = self.push_node(NodeKind::Text, pos, cur.pos());

        let Some(processor) = config.delimiters.get(&ch) else {
            return;
        };
        let flags = processor.classify(before, after);
        if count >= processor.min_length() && (flags.can_open || flags.can_close) {
            self.delimiters.push(Delimiter {
                run: DelimiterRun {
                    ch,
                    len: count,
                    original_len: count,
                    can_open: flags.can_open,
                    can_close: flags.can_close,
                },
                node,
            });
        }
    }

    /// Handles `]` at `pos`. Returns where literal text resumes.
    fn close_bracket(&mut self, s: &str, pos: usize, cur: &mut Cursor<'_>) -> usize {
        let Some(bracket) = self.brackets.pop() else {
            return pos;
        };
        if !bracket.active {
            return pos;
        }

        let after = pos + 1;
        let rest = &s[after..];
        let mut link = inline_link_tail(rest).map(|(destination, title, len)| {
            let kind = NodeKind::Link {
                destination,
                title,
                reference: None,
            };
            (kind, after + len)
        });
        if link.is_none() {
            let (label, end) = if let Some((inner, len)) = LinkSyntax::label(rest) {
                (inner, after + len)
            } else if rest.starts_with("[]") {
                (&s[bracket.pos + 1..pos], after + 2)
            } else {
                (&s[bracket.pos + 1..pos], after)
            };
            let normalized = normalize_label(label);
            link = self.references.get(&normalized).map(|target| {
                let kind = NodeKind::Link {
                    destination: target.destination.clone(),
                    title: target.title.clone(),
                    reference: Some(normalized.clone()),
                };
                (kind, end)
            });
        }
        let Some((kind, end)) = link else {
            return pos;
        };

        self.process_delimiters(bracket.delimiter_bottom);

        let span = self.content.span_to_source(bracket.pos, end);
        trace!("link at {}..{}", span.start, span.end);
        let link_node = self.tree.new_node(kind, span);
        let mut inner = Vec::new();
        let mut next = self.tree.next_sibling(bracket.node);
        while let Some(id) = next {
            inner.push(id);
            next = self.tree.next_sibling(id);
        }
        self.tree.insert_after(bracket.node, link_node);
        for id in inner {
            self.tree.append_child(link_node, id);
        }
        self.tree.unlink(bracket.node);

        for earlier in &mut self.brackets {
            earlier.active = false;
        }
        cur.i = end;
        end
    }

    /// Pairs delimiter runs above `bottom`, innermost closers first, then
    /// drops every run above `bottom` from the stack.
    fn process_delimiters(&mut self, bottom: usize) {
        let config = self.config;
        let mut closer = bottom;
        while closer < self.delimiters.len() {
            let closer_run = self.delimiters[closer].run;
            if !closer_run.can_close {
                closer += 1;
                continue;
            }
            let Some(processor) = config.delimiters.get(&closer_run.ch) else {
                closer += 1;
                continue;
            };

            let mut found = None;
            let mut i = closer;
            while i > bottom {
                i -= 1;
                let opener_run = self.delimiters[i].run;
                if opener_run.ch == closer_run.ch && opener_run.can_open {
                    let used = processor.delimiter_use(&opener_run, &closer_run);
                    if used > 0 {
                        found = Some((i, used));
                        break;
                    }
                }
            }
            let Some((opener, used)) = found else {
                if closer_run.can_open {
                    closer += 1;
                } else {
                    self.delimiters.remove(closer);
                }
                continue;
            };

            let width = used * closer_run.ch.len_utf8();
            let opener_node = self.delimiters[opener].node;
            let closer_node = self.delimiters[closer].node;
            let opener_span = self.tree.span(opener_node);
            let closer_span = self.tree.span(closer_node);
            self.tree
                .set_span(opener_node, Span::new(opener_span.start, opener_span.end - width));
            self.tree
                .set_span(closer_node, Span::new(closer_span.start + width, closer_span.end));

            let mut pair = DelimiterMatch {
                tree: &mut *self.tree,
                opener: opener_node,
                closer: closer_node,
                span: Span::new(opener_span.end - width, closer_span.start + width),
            };
            processor.process(&mut pair, used);

            // runs between the pair can no longer match anything
            self.delimiters.drain(opener + 1..closer);
            closer = opener + 1;
            self.delimiters[opener].run.len -= used;
            self.delimiters[closer].run.len -= used;
            if self.delimiters[opener].run.len == 0 {
                self.tree.unlink(opener_node);
                self.delimiters.remove(opener);
                closer -= 1;
            }
            if self.delimiters[closer].run.len == 0 {
                self.tree.unlink(closer_node);
                self.delimiters.remove(closer);
            }
        }
        self.delimiters.truncate(bottom);
    }
}

/// Parses `(destination "title")` right after a link's closing bracket.
/// Returns the destination, title and bytes consumed.
fn inline_link_tail(rest: &str) -> Option<(String, Option<String>, usize)> {
    if !rest.starts_with('(') {
        return None;
    }
    let skip_ws = |from: usize| {
        from + rest[from..].len() - rest[from..].trim_start().len()
    };
    let mut i = skip_ws(1);
    let destination = if rest[i..].starts_with(')') {
        String::new()
    } else {
        let (destination, len) = LinkSyntax::destination(&rest[i..])?;
        i += len;
        destination
    };
    let before_title = i;
    i = skip_ws(i);
    let mut title = None;
    if i > before_title {
        if let Some((t, len)) = LinkSyntax::title(&rest[i..]) {
            title = Some(t);
            i = skip_ws(i + len);
        }
    }
    rest[i..].starts_with(')').then(|| (destination, title, i + 1))
}
