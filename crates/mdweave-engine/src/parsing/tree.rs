//! Arena-backed document tree.
//!
//! Nodes live in a single `Vec` and refer to each other by [`NodeId`].
//! Sibling order is the order of the parent's `children`; a node belongs to
//! at most one parent at a time and unlinked nodes stay in the arena.

use serde::Serialize;

use super::blocks::content::BlockLine;
use super::node::NodeKind;
use super::rope::Span;

/// Index of a node within its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) span: Span,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) lines: Vec<BlockLine>,
}

impl Node {
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Content lines collected by leaf blocks during the block phase.
    pub fn lines(&self) -> &[BlockLine] {
        &self.lines
    }
}

#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a detached node.
    pub fn new_node(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            span,
            parent: None,
            children: Vec::new(),
            lines: Vec::new(),
        });
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        self.nodes[id.0].kind = kind;
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.0].span
    }

    pub fn set_span(&mut self, id: NodeId, span: Span) {
        self.nodes[id.0].span = span;
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].children.first().copied()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].children.last().copied()
    }

    pub fn lines(&self, id: NodeId) -> &[BlockLine] {
        &self.nodes[id.0].lines
    }

    pub fn lines_mut(&mut self, id: NodeId) -> &mut Vec<BlockLine> {
        &mut self.nodes[id.0].lines
    }

    fn position(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(id)?;
        let pos = self.children(parent).iter().position(|&c| c == id)?;
        Some((parent, pos))
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, pos) = self.position(id)?;
        self.children(parent).get(pos + 1).copied()
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, pos) = self.position(id)?;
        pos.checked_sub(1).map(|p| self.children(parent)[p])
    }

    /// Detaches `id` from its parent. No-op for detached nodes.
    pub fn unlink(&mut self, id: NodeId) {
        if let Some((parent, pos)) = self.position(id) {
            self.nodes[parent.0].children.remove(pos);
        }
        self.nodes[id.0].parent = None;
    }

    /// Makes `child` the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        assert!(
            !self.is_ancestor_or_self(child, parent),
            "appending {child:?} under {parent:?} would create a cycle"
        );
        self.unlink(child);
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Places `node` immediately before `anchor` among anchor's siblings.
    pub fn insert_before(&mut self, anchor: NodeId, node: NodeId) {
        self.insert_at_offset(anchor, node, 0);
    }

    /// Places `node` immediately after `anchor` among anchor's siblings.
    pub fn insert_after(&mut self, anchor: NodeId, node: NodeId) {
        self.insert_at_offset(anchor, node, 1);
    }

    fn insert_at_offset(&mut self, anchor: NodeId, node: NodeId, offset: usize) {
        assert_ne!(anchor, node, "cannot insert a node next to itself");
        self.unlink(node);
        let (parent, pos) = self
            .position(anchor)
            .unwrap_or_else(|| panic!("anchor {anchor:?} has no parent"));
        self.nodes[parent.0].children.insert(pos + offset, node);
        self.nodes[node.0].parent = Some(parent);
    }

    /// True if `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// `id` followed by its ancestors up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |&n| self.parent(n))
    }

    /// Pre-order walk of `root` and everything below it.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![root],
        }
    }

    /// Last child that is not a blank-line node.
    pub fn last_content_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id)
            .iter()
            .rev()
            .copied()
            .find(|&c| !matches!(self.kind(c), NodeKind::BlankLine))
    }

    pub fn first_content_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&c| !matches!(self.kind(c), NodeKind::BlankLine))
    }
}

pub struct Descendants<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
