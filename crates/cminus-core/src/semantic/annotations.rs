//! Per-node facts recorded by the passes
//!
//! The syntax tree stays immutable; everything the analysis learns about a
//! node is keyed by its id here.

use std::collections::HashMap;

use super::scope::ScopeId;
use super::symbols::SymbolId;
use crate::syntax::{ExpType, NodeId};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Annotations {
    types: HashMap<NodeId, ExpType>,
    scopes: HashMap<NodeId, ScopeId>,
    resolutions: HashMap<NodeId, SymbolId>,
    declarations: HashMap<NodeId, SymbolId>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_type(&mut self, node: NodeId, ty: ExpType) {
        self.types.insert(node, ty);
    }

    /// Type computed for an expression; `None` while it is unset.
    pub fn type_of(&self, node: NodeId) -> Option<ExpType> {
        self.types.get(&node).copied()
    }

    /// Attaches `scope` to a compound block. A block keeps the first scope
    /// it was given; returns `false` if one was already attached.
    pub fn bind_scope(&mut self, block: NodeId, scope: ScopeId) -> bool {
        if self.scopes.contains_key(&block) {
            return false;
        }
        self.scopes.insert(block, scope);
        true
    }

    pub fn scope_of(&self, block: NodeId) -> Option<ScopeId> {
        self.scopes.get(&block).copied()
    }

    pub fn resolve(&mut self, node: NodeId, symbol: SymbolId) {
        self.resolutions.insert(node, symbol);
    }

    pub fn resolution(&self, node: NodeId) -> Option<SymbolId> {
        self.resolutions.get(&node).copied()
    }

    pub fn record_declaration(&mut self, node: NodeId, symbol: SymbolId) {
        self.declarations.insert(node, symbol);
    }

    pub fn declared_symbol(&self, node: NodeId) -> Option<SymbolId> {
        self.declarations.get(&node).copied()
    }

    pub fn typed_nodes(&self) -> usize {
        self.types.len()
    }
}
