//! Programmatic construction of syntax trees
//!
//! Stands in for the parser's reduce actions when trees are built in code
//! (tests, benchmarks, embedding). Every constructor returns the new node's
//! id; list arguments are linked into sibling chains.

use super::{Decl, DeclKind, ExpType, ExprKind, NodeId, NodeKind, Operator, StmtKind, SyntaxTree};

#[derive(Default)]
pub struct TreeBuilder {
    tree: SyntaxTree,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn var(&mut self, line: u32, name: &str, ty: ExpType) -> NodeId {
        self.decl(line, DeclKind::Var, name, ty, None)
    }

    pub fn array_var(&mut self, line: u32, name: &str, size: u32) -> NodeId {
        self.decl(line, DeclKind::Var, name, ExpType::Array, Some(size))
    }

    pub fn param(&mut self, line: u32, name: &str, ty: ExpType) -> NodeId {
        self.decl(line, DeclKind::Param, name, ty, None)
    }

    /// The `(void)` parameter list: a single unnamed void parameter.
    pub fn void_params(&mut self, line: u32) -> NodeId {
        self.decl(line, DeclKind::Param, "", ExpType::Void, None)
    }

    pub fn fun(
        &mut self,
        line: u32,
        name: &str,
        return_type: ExpType,
        params: &[NodeId],
        body: NodeId,
    ) -> NodeId {
        let fun = self.decl(line, DeclKind::Fun, name, return_type, None);
        let params = self.tree.chain(params);
        self.tree.set_child(fun, 0, params);
        self.tree.set_child(fun, 1, Some(body));
        fun
    }

    pub fn compound(&mut self, line: u32, decls: &[NodeId], stmts: &[NodeId]) -> NodeId {
        let block = self.tree.alloc(NodeKind::Stmt(StmtKind::Compound), line);
        let decls = self.tree.chain(decls);
        let stmts = self.tree.chain(stmts);
        self.tree.set_child(block, 0, decls);
        self.tree.set_child(block, 1, stmts);
        block
    }

    pub fn if_stmt(
        &mut self,
        line: u32,
        condition: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
    ) -> NodeId {
        let stmt = self.tree.alloc(NodeKind::Stmt(StmtKind::If), line);
        self.tree.set_child(stmt, 0, Some(condition));
        self.tree.set_child(stmt, 1, Some(then_branch));
        self.tree.set_child(stmt, 2, else_branch);
        stmt
    }

    pub fn while_stmt(&mut self, line: u32, condition: NodeId, body: NodeId) -> NodeId {
        let stmt = self.tree.alloc(NodeKind::Stmt(StmtKind::While), line);
        self.tree.set_child(stmt, 0, Some(condition));
        self.tree.set_child(stmt, 1, Some(body));
        stmt
    }

    pub fn ret(&mut self, line: u32, value: Option<NodeId>) -> NodeId {
        let stmt = self.tree.alloc(NodeKind::Stmt(StmtKind::Return), line);
        self.tree.set_child(stmt, 0, value);
        stmt
    }

    pub fn op(&mut self, line: u32, op: Operator, left: NodeId, right: NodeId) -> NodeId {
        let expr = self.tree.alloc(NodeKind::Expr(ExprKind::Op(op)), line);
        self.tree.set_child(expr, 0, Some(left));
        self.tree.set_child(expr, 1, Some(right));
        expr
    }

    pub fn assign(&mut self, line: u32, target: NodeId, value: NodeId) -> NodeId {
        self.op(line, Operator::Assign, target, value)
    }

    pub fn constant(&mut self, line: u32, value: i64) -> NodeId {
        self.tree.alloc(NodeKind::Expr(ExprKind::Const(value)), line)
    }

    pub fn id(&mut self, line: u32, name: &str) -> NodeId {
        self.tree
            .alloc(NodeKind::Expr(ExprKind::Id(name.to_string())), line)
    }

    pub fn array_id(&mut self, line: u32, name: &str, index: NodeId) -> NodeId {
        let expr = self
            .tree
            .alloc(NodeKind::Expr(ExprKind::ArrayId(name.to_string())), line);
        self.tree.set_child(expr, 0, Some(index));
        expr
    }

    pub fn call(&mut self, line: u32, name: &str, args: &[NodeId]) -> NodeId {
        let expr = self
            .tree
            .alloc(NodeKind::Expr(ExprKind::Call(name.to_string())), line);
        let args = self.tree.chain(args);
        self.tree.set_child(expr, 0, args);
        expr
    }

    /// Chains the top-level items into the program list and returns the tree.
    pub fn finish(mut self, program: &[NodeId]) -> SyntaxTree {
        let root = self.tree.chain(program);
        self.tree.set_root(root);
        self.tree
    }

    fn decl(
        &mut self,
        line: u32,
        kind: DeclKind,
        name: &str,
        ty: ExpType,
        size: Option<u32>,
    ) -> NodeId {
        self.tree.alloc(
            NodeKind::Decl(Decl {
                kind,
                name: name.to_string(),
                ty,
                size,
            }),
            line,
        )
    }
}
