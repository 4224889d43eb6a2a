//! Block bookkeeping for one parse: which blocks exist, grouped by
//! [`Category`], and which block parser produced which node.

use std::collections::{BTreeSet, HashMap};

use super::node::Category;
use super::tree::{NodeId, Tree};

/// Index of a block parser within one parse.
pub type ParserId = usize;

#[derive(Debug, Default)]
pub struct BlockTracker {
    by_category: HashMap<Category, BTreeSet<NodeId>>,
    node_parser: HashMap<NodeId, ParserId>,
    parser_node: HashMap<ParserId, NodeId>,
}

impl BlockTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a freshly started parser together with the block it builds.
    pub fn parser_added(&mut self, parser: ParserId, node: NodeId, category: Category) {
        self.node_parser.insert(node, parser);
        self.parser_node.insert(parser, node);
        self.block_added(node, category);
    }

    /// Forgets a parser and its block.
    pub fn parser_removed(&mut self, parser: ParserId, category: Category) {
        if let Some(node) = self.parser_node.remove(&parser) {
            self.node_parser.remove(&node);
            self.block_removed(node, category);
        }
    }

    pub fn block_added(&mut self, node: NodeId, category: Category) {
        self.by_category.entry(category).or_default().insert(node);
    }

    pub fn block_removed(&mut self, node: NodeId, category: Category) {
        if let Some(set) = self.by_category.get_mut(&category) {
            set.remove(&node);
            if set.is_empty() {
                self.by_category.remove(&category);
            }
        }
    }

    pub fn block_removed_with_descendants(&mut self, tree: &Tree, node: NodeId) {
        for id in tree.descendants(node) {
            self.block_removed(id, tree.kind(id).category());
        }
    }

    pub fn parser_for(&self, node: NodeId) -> Option<ParserId> {
        self.node_parser.get(&node).copied()
    }

    pub fn node_for(&self, parser: ParserId) -> Option<NodeId> {
        self.parser_node.get(&parser).copied()
    }

    pub fn contains(&self, node: NodeId, category: Category) -> bool {
        self.by_category
            .get(&category)
            .is_some_and(|set| set.contains(&node))
    }

    pub fn has_category(&self, category: Category) -> bool {
        self.by_category.contains_key(&category)
    }

    /// Tracked blocks of any of `categories`, ordered by node id.
    pub fn items(&self, categories: &[Category]) -> Vec<NodeId> {
        let merged: BTreeSet<NodeId> = categories
            .iter()
            .filter_map(|c| self.by_category.get(c))
            .flatten()
            .copied()
            .collect();
        merged.into_iter().collect()
    }
}
