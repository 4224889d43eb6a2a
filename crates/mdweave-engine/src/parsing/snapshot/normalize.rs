use crate::parsing::document::Document;
use crate::parsing::node::{ListMarker, NodeKind};
use crate::parsing::rope::preview;
use crate::parsing::tree::NodeId;

const PREVIEW_LEN: usize = 40;

/// Renders the tree one node per line, indented by depth:
///
/// ```text
/// Document [0..11]
///   Paragraph [0..10]
///     Text [0..6] "Hello "
///     Emphasis [6..10]
///       Text [7..9] "hi"
/// ```
///
/// Text-like nodes show their source text; code and HTML blocks list their
/// content lines prefixed with `|`.
pub fn outline(doc: &Document) -> String {
    let mut out = String::new();
    write_node(doc, doc.root(), 0, &mut out);
    out
}

fn write_node(doc: &Document, node: NodeId, depth: usize, out: &mut String) {
    let tree = doc.tree();
    let kind = tree.kind(node);
    let span = tree.span(node);
    let indent = "  ".repeat(depth);

    out.push_str(&format!("{indent}{} [{}..{}]", label(doc, kind), span.start, span.end));
    if matches!(kind, NodeKind::Text | NodeKind::CodeSpan { .. }) {
        out.push_str(&format!(" {:?}", preview(doc.source(), span, PREVIEW_LEN)));
    }
    out.push('\n');

    if matches!(
        kind,
        NodeKind::FencedCode { .. } | NodeKind::IndentedCode | NodeKind::HtmlBlock { .. }
    ) {
        for line in tree.lines(node) {
            let text = format!("{}{}", " ".repeat(line.tab_fill), doc.slice(line.content));
            out.push_str(&format!("{indent}  | {text}\n"));
        }
    }

    for &child in tree.children(node) {
        write_node(doc, child, depth + 1, out);
    }
}

fn marker(marker: ListMarker) -> String {
    match marker {
        ListMarker::Bullet(c) => format!("'{c}'"),
        ListMarker::Ordered { start, delimiter } => format!("{start}{delimiter}"),
    }
}

fn label(doc: &Document, kind: &NodeKind) -> String {
    match kind {
        NodeKind::Heading { level, setext } => {
            let style = if *setext { ", setext" } else { "" };
            format!("Heading(h{level}{style})")
        }
        NodeKind::List { marker: m, tight } => {
            let spacing = if *tight { "tight" } else { "loose" };
            format!("List({}, {spacing})", marker(*m))
        }
        NodeKind::ListItem { marker: m } => format!("ListItem({})", marker(*m)),
        NodeKind::FencedCode {
            fence,
            fence_len,
            info,
            ..
        } => {
            let fence: String = std::iter::repeat_n(*fence, *fence_len).collect();
            match info {
                Some(info) => format!("FencedCode({fence}, {:?})", doc.slice(*info)),
                None => format!("FencedCode({fence})"),
            }
        }
        NodeKind::HtmlBlock { html_kind } => format!("HtmlBlock({html_kind})"),
        NodeKind::ReferenceDefinition {
            label, destination, ..
        } => format!("ReferenceDefinition({label:?} -> {destination:?})"),
        NodeKind::Link { destination, .. } => format!("Link({destination:?})"),
        NodeKind::WikiLink { target, alias } => match alias {
            Some(alias) => format!(
                "WikiLink({:?} | {:?})",
                doc.slice(*target),
                doc.slice(*alias)
            ),
            None => format!("WikiLink({:?})", doc.slice(*target)),
        },
        NodeKind::CustomBlock(custom) => custom.name.to_string(),
        NodeKind::CustomInline(name) => (*name).to_string(),
        other => other.name().to_string(),
    }
}
