//! JSON hand-off format for syntax trees
//!
//! An external parser serializes its tree as a flat node list; links are
//! indices into that list. Loading validates the links before any node is
//! handed to the analysis, so the walks never meet a dangling or shared node.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::{Decl, DeclKind, ExpType, ExprKind, MAX_CHILDREN, NodeId, NodeKind, Operator, StmtKind, SyntaxTree};

#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("Failed to read syntax tree '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid syntax tree JSON: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Node {node} links to node {target}, but the tree has {len} nodes")]
    DanglingLink {
        node: usize,
        target: usize,
        len: usize,
    },
    #[error("Root {root} is out of range for a tree of {len} nodes")]
    DanglingRoot { root: usize, len: usize },
    #[error("Node {node} has {count} children, at most 3 are allowed")]
    TooManyChildren { node: usize, count: usize },
    #[error("Node {node} is linked more than once")]
    SharedNode { node: usize },
}

#[derive(Debug, Deserialize)]
struct JsonTree {
    #[serde(default)]
    root: Option<usize>,
    #[serde(default)]
    nodes: Vec<JsonNode>,
}

#[derive(Debug, Deserialize)]
struct JsonNode {
    #[serde(flatten)]
    kind: JsonNodeKind,
    #[serde(default)]
    line: u32,
    #[serde(default)]
    children: Vec<Option<usize>>,
    #[serde(default)]
    sibling: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum JsonNodeKind {
    If,
    While,
    Compound,
    Return,
    Op {
        op: Operator,
    },
    Const {
        value: i64,
    },
    Id {
        name: String,
    },
    ArrayId {
        name: String,
    },
    Call {
        name: String,
    },
    Var {
        name: String,
        #[serde(rename = "type")]
        ty: ExpType,
        #[serde(default)]
        size: Option<u32>,
    },
    Fun {
        name: String,
        #[serde(rename = "type")]
        ty: ExpType,
    },
    Param {
        #[serde(default)]
        name: String,
        #[serde(rename = "type")]
        ty: ExpType,
    },
}

impl From<JsonNodeKind> for NodeKind {
    fn from(kind: JsonNodeKind) -> Self {
        let decl = |kind, name, ty, size| NodeKind::Decl(Decl { kind, name, ty, size });
        match kind {
            JsonNodeKind::If => NodeKind::Stmt(StmtKind::If),
            JsonNodeKind::While => NodeKind::Stmt(StmtKind::While),
            JsonNodeKind::Compound => NodeKind::Stmt(StmtKind::Compound),
            JsonNodeKind::Return => NodeKind::Stmt(StmtKind::Return),
            JsonNodeKind::Op { op } => NodeKind::Expr(ExprKind::Op(op)),
            JsonNodeKind::Const { value } => NodeKind::Expr(ExprKind::Const(value)),
            JsonNodeKind::Id { name } => NodeKind::Expr(ExprKind::Id(name)),
            JsonNodeKind::ArrayId { name } => NodeKind::Expr(ExprKind::ArrayId(name)),
            JsonNodeKind::Call { name } => NodeKind::Expr(ExprKind::Call(name)),
            JsonNodeKind::Var { name, ty, size } => decl(DeclKind::Var, name, ty, size),
            JsonNodeKind::Fun { name, ty } => decl(DeclKind::Fun, name, ty, None),
            JsonNodeKind::Param { name, ty } => decl(DeclKind::Param, name, ty, None),
        }
    }
}

pub fn load_tree(path: &Path) -> Result<SyntaxTree, TreeError> {
    let content = std::fs::read_to_string(path).map_err(|e| TreeError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    from_json(&content)
}

pub fn from_json(content: &str) -> Result<SyntaxTree, TreeError> {
    let raw: JsonTree = serde_json::from_str(content)?;
    validate(&raw)?;

    let mut tree = SyntaxTree::new();
    let mut ids: Vec<NodeId> = Vec::with_capacity(raw.nodes.len());
    let mut links = Vec::with_capacity(raw.nodes.len());

    for node in raw.nodes {
        ids.push(tree.alloc(node.kind.into(), node.line));
        links.push((node.children, node.sibling));
    }

    for (index, (children, sibling)) in links.into_iter().enumerate() {
        for (slot, child) in children.into_iter().enumerate() {
            tree.set_child(ids[index], slot, child.map(|c| ids[c]));
        }
        tree.set_sibling(ids[index], sibling.map(|s| ids[s]));
    }

    tree.set_root(raw.root.map(|r| ids[r]));
    debug!(nodes = tree.len(), "loaded syntax tree");
    Ok(tree)
}

fn validate(raw: &JsonTree) -> Result<(), TreeError> {
    let len = raw.nodes.len();
    let mut linked = vec![false; len];

    if let Some(root) = raw.root {
        if root >= len {
            return Err(TreeError::DanglingRoot { root, len });
        }
        linked[root] = true;
    }

    for (index, node) in raw.nodes.iter().enumerate() {
        if node.children.len() > MAX_CHILDREN {
            return Err(TreeError::TooManyChildren {
                node: index,
                count: node.children.len(),
            });
        }

        let targets = node.children.iter().flatten().chain(node.sibling.iter());
        for &target in targets {
            if target >= len {
                return Err(TreeError::DanglingLink {
                    node: index,
                    target,
                    len,
                });
            }
            if linked[target] {
                return Err(TreeError::SharedNode { node: target });
            }
            linked[target] = true;
        }
    }

    Ok(())
}
