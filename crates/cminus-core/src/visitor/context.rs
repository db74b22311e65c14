//! Visitor context providing tree access during traversal.

use crate::syntax::{Node, NodeId, SiblingIter, SyntaxTree};

pub struct VisitorContext<'a> {
    tree: &'a SyntaxTree,
}

impl<'a> VisitorContext<'a> {
    pub fn new(tree: &'a SyntaxTree) -> Self {
        Self { tree }
    }

    pub fn tree(&self) -> &'a SyntaxTree {
        self.tree
    }

    pub fn node(&self, id: NodeId) -> &'a Node {
        self.tree.get(id)
    }

    /// Iterates the list hanging off `node`'s child `slot`.
    pub fn list(&self, node: &Node, slot: usize) -> SiblingIter<'a> {
        self.tree.siblings(node.child(slot))
    }
}
