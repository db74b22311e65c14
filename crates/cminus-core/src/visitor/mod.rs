//! Visitor pattern for syntax tree traversal.
//!
//! Every pass walks the tree in the same order: enter a node, walk its child
//! slots in order, leave it, then move on to its sibling.

mod context;
mod traits;

pub use context::VisitorContext;
pub use traits::TreeVisitor;

use std::ops::ControlFlow;

use crate::syntax::NodeId;

/// Walks the sibling chain starting at `first`, descending into every child
/// slot. Stops as soon as the visitor breaks.
///
/// Chains are followed iteratively, so long statement or declaration lists
/// do not deepen the call stack.
pub fn walk<B, V: TreeVisitor<B>>(
    ctx: &VisitorContext<'_>,
    first: Option<NodeId>,
    visitor: &mut V,
) -> ControlFlow<B> {
    for node in ctx.tree().siblings(first) {
        visitor.enter(node, ctx)?;
        for child in node.children {
            walk(ctx, child, visitor)?;
        }
        visitor.leave(node, ctx)?;
    }
    ControlFlow::Continue(())
}

/// Walks the whole program from the tree's root.
pub fn walk_tree<B, V: TreeVisitor<B>>(ctx: &VisitorContext<'_>, visitor: &mut V) -> ControlFlow<B> {
    walk(ctx, ctx.tree().root(), visitor)
}
