use std::collections::HashSet;

use crate::parsing::document::Document;

/// Asserts that the tree is well formed:
///
/// - the root has no parent, every other node exactly the one listing it
/// - each node is reached once from the root
/// - spans lie within the source and within the parent's span
/// - siblings are in source order and do not overlap
pub fn check(doc: &Document) {
    let tree = doc.tree();
    let root = doc.root();
    let len = doc.source().len();
    assert_eq!(tree.parent(root), None, "the root has a parent");

    let mut seen = HashSet::new();
    for id in tree.descendants(root) {
        assert!(seen.insert(id), "node {id:?} is reachable twice");
        let span = tree.span(id);
        assert!(
            span.start <= span.end && span.end <= len,
            "span out of bounds: {span:?} (source len: {len})"
        );

        let children = tree.children(id);
        for &child in children {
            assert_eq!(
                tree.parent(child),
                Some(id),
                "child {child:?} does not point back to {id:?}"
            );
            let child_span = tree.span(child);
            assert!(
                span.contains(child_span),
                "{} {child_span:?} escapes its parent {} {span:?}",
                tree.kind(child).name(),
                tree.kind(id).name()
            );
        }
        for pair in children.windows(2) {
            let (a, b) = (tree.span(pair[0]), tree.span(pair[1]));
            assert!(
                a.end <= b.start,
                "siblings out of order or overlapping: {a:?} then {b:?}"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse_document;
    use crate::parsing::rope::Span;

    #[test]
    fn accepts_parsed_documents() {
        check(&parse_document("# t\n\n> a\n> - b\n>   c\n\n```\nx\n```\n"));
    }

    #[test]
    #[should_panic(expected = "escapes its parent")]
    fn rejects_child_outside_parent() {
        let mut doc = parse_document("para\n");
        let para = doc.tree().children(doc.root())[0];
        doc.tree_mut().set_span(para, Span::new(0, 2));
        check(&doc);
    }
}
