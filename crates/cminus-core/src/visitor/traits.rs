//! TreeVisitor trait for uniform syntax tree traversal.

use std::ops::ControlFlow;

use super::context::VisitorContext;
use crate::syntax::Node;

/// Callbacks for [`walk`](super::walk). `B` is the value a visitor breaks
/// with to abort the walk.
pub trait TreeVisitor<B = ()> {
    fn enter(&mut self, _node: &Node, _ctx: &VisitorContext) -> ControlFlow<B> {
        ControlFlow::Continue(())
    }

    fn leave(&mut self, _node: &Node, _ctx: &VisitorContext) -> ControlFlow<B> {
        ControlFlow::Continue(())
    }
}
