use std::collections::BTreeMap;

use xi_rope::Rope;

use super::inline::kinds::normalize_label;
use super::rope::{Span, slice_to_string};
use super::snapshot::normalize::outline;
use super::tree::{NodeId, Tree};

/// Target of a reference definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReference {
    pub destination: String,
    pub title: Option<String>,
    /// The `ReferenceDefinition` node that declared it.
    pub node: NodeId,
}

/// Reference definitions collected during pre-processing, keyed by
/// normalised label.
#[derive(Debug, Clone, Default)]
pub struct ReferenceMap {
    entries: BTreeMap<String, LinkReference>,
}

impl ReferenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a definition unless its label is already defined. Returns
    /// whether it was added.
    pub fn insert(&mut self, label: impl AsRef<str>, reference: LinkReference) -> bool {
        let key = normalize_label(label.as_ref());
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, reference);
        true
    }

    pub fn get(&self, label: &str) -> Option<&LinkReference> {
        self.entries.get(&normalize_label(label))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LinkReference)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A parsed document: the source text, the node tree over it, and the
/// state collected while parsing.
#[derive(Debug, Clone)]
pub struct Document {
    source: Rope,
    tree: Tree,
    root: NodeId,
    references: ReferenceMap,
}

impl Document {
    pub(crate) fn new(source: Rope, tree: Tree, root: NodeId, references: ReferenceMap) -> Self {
        Self {
            source,
            tree,
            root,
            references,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn source(&self) -> &Rope {
        &self.source
    }

    pub fn references(&self) -> &ReferenceMap {
        &self.references
    }

    pub fn references_mut(&mut self) -> &mut ReferenceMap {
        &mut self.references
    }

    /// Exact source text covered by `node`.
    pub fn text(&self, node: NodeId) -> String {
        self.slice(self.tree.span(node))
    }

    pub fn slice(&self, span: Span) -> String {
        slice_to_string(&self.source, span)
    }

    /// Indented one-node-per-line rendering of the tree, for debugging and
    /// snapshot tests.
    pub fn outline(&self) -> String {
        outline(self)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn reference(destination: &str) -> LinkReference {
        LinkReference {
            destination: destination.to_string(),
            title: None,
            node: NodeId(0),
        }
    }

    #[test]
    fn first_definition_wins() {
        let mut map = ReferenceMap::new();
        assert!(map.insert("Foo", reference("/a")));
        assert!(!map.insert("  foo ", reference("/b")));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("FOO").map(|r| r.destination.as_str()), Some("/a"));
    }

    #[test]
    fn iterates_in_label_order() {
        let mut map = ReferenceMap::new();
        map.insert("b", reference("/b"));
        map.insert("a", reference("/a"));
        let labels: Vec<_> = map.iter().map(|(label, _)| label).collect();
        assert_eq!(labels, vec!["a", "b"]);
    }
}
