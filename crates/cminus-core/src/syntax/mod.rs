//! Syntax tree consumed by semantic analysis
//!
//! The parser owns the grammar; this module only fixes the shape of the
//! tree it hands over. Nodes live in an arena and link to each other by id:
//! up to three structural children per node plus a sibling link that
//! chains declaration, statement, parameter and argument lists.

pub mod builder;
pub mod json;

use std::fmt;

use id_arena::{Arena, Id};
use serde::{Deserialize, Serialize};

pub use builder::TreeBuilder;
pub use json::TreeError;

pub type NodeId = Id<Node>;

pub const MAX_CHILDREN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpType {
    Void,
    Integer,
    Array,
}

impl fmt::Display for ExpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExpType::Void => "void",
            ExpType::Integer => "int",
            ExpType::Array => "int[]",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Assign,
    Plus,
    Minus,
    Times,
    Over,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Assign => "=",
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Times => "*",
            Operator::Over => "/",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Eq => "==",
            Operator::Ne => "!=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCategory {
    Statement,
    Expression,
    Declaration,
}

/// Statement kinds. Child slots: `If` 0 = condition, 1 = then, 2 = else;
/// `While` 0 = condition, 1 = body; `Compound` 0 = local declarations,
/// 1 = statements; `Return` 0 = optional value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StmtKind {
    If,
    While,
    Compound,
    Return,
}

impl StmtKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            StmtKind::If => "if",
            StmtKind::While => "while",
            StmtKind::Compound => "{ }",
            StmtKind::Return => "return",
        }
    }
}

/// Expression kinds. Child slots: `Op` 0 = left, 1 = right; `ArrayId`
/// 0 = index; `Call` 0 = argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprKind {
    Op(Operator),
    Const(i64),
    Id(String),
    ArrayId(String),
    Call(String),
}

impl ExprKind {
    /// Name carried by identifier uses, `None` for operators and constants.
    pub fn name(&self) -> Option<&str> {
        match self {
            ExprKind::Id(name) | ExprKind::ArrayId(name) | ExprKind::Call(name) => {
                Some(name.as_str())
            }
            ExprKind::Op(_) | ExprKind::Const(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Var,
    Fun,
    Param,
}

/// Declaration payload. For `Fun` the type is the return type and child
/// slot 0 holds the parameter list, slot 1 the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decl {
    pub kind: DeclKind,
    pub name: String,
    pub ty: ExpType,
    pub size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Stmt(StmtKind),
    Expr(ExprKind),
    Decl(Decl),
}

impl NodeKind {
    pub fn category(&self) -> NodeCategory {
        match self {
            NodeKind::Stmt(_) => NodeCategory::Statement,
            NodeKind::Expr(_) => NodeCategory::Expression,
            NodeKind::Decl(_) => NodeCategory::Declaration,
        }
    }
}

#[derive(Debug)]
pub struct Node {
    pub id: NodeId,
    pub line: u32,
    pub kind: NodeKind,
    pub children: [Option<NodeId>; MAX_CHILDREN],
    pub sibling: Option<NodeId>,
}

impl Node {
    pub fn child(&self, slot: usize) -> Option<NodeId> {
        self.children.get(slot).copied().flatten()
    }

    pub fn is_compound(&self) -> bool {
        matches!(self.kind, NodeKind::Stmt(StmtKind::Compound))
    }

    pub fn decl(&self) -> Option<&Decl> {
        match &self.kind {
            NodeKind::Decl(decl) => Some(decl),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct SyntaxTree {
    arena: Arena<Node>,
    root: Option<NodeId>,
}

impl Default for SyntaxTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn alloc(&mut self, kind: NodeKind, line: u32) -> NodeId {
        self.arena.alloc_with_id(|id| Node {
            id,
            line,
            kind,
            children: [None; MAX_CHILDREN],
            sibling: None,
        })
    }

    pub fn set_child(&mut self, parent: NodeId, slot: usize, child: Option<NodeId>) {
        self.arena[parent].children[slot] = child;
    }

    pub fn set_sibling(&mut self, node: NodeId, next: Option<NodeId>) {
        self.arena[node].sibling = next;
    }

    pub fn set_root(&mut self, root: Option<NodeId>) {
        self.root = root;
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.arena[id]
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }

    /// All nodes in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.arena.iter().map(|(_, node)| node)
    }

    /// Iterates a sibling chain starting at `first`.
    pub fn siblings(&self, first: Option<NodeId>) -> SiblingIter<'_> {
        SiblingIter {
            tree: self,
            current: first,
        }
    }

    /// Links `nodes` into one sibling chain and returns its head.
    pub fn chain(&mut self, nodes: &[NodeId]) -> Option<NodeId> {
        for pair in nodes.windows(2) {
            self.set_sibling(pair[0], Some(pair[1]));
        }
        nodes.first().copied()
    }
}

pub struct SiblingIter<'a> {
    tree: &'a SyntaxTree,
    current: Option<NodeId>,
}

impl<'a> Iterator for SiblingIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let current_id = self.current?;
        let node = &self.tree.arena[current_id];
        self.current = node.sibling;
        Some(node)
    }
}
