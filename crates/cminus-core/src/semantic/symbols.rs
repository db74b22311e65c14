//! Symbol table for tracking declarations and references
//!
//! Each scope owns an independent name map; lookup walks the scope chain
//! outward so an inner declaration shadows an outer one.

use std::collections::HashMap;

use id_arena::{Arena, Id};

use super::scope::{ScopeId, ScopeTable};
use crate::syntax::{DeclKind, ExpType, NodeId};

pub type SymbolId = Id<Symbol>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
    Parameter,
}

impl From<DeclKind> for SymbolKind {
    fn from(kind: DeclKind) -> Self {
        match kind {
            DeclKind::Var => SymbolKind::Variable,
            DeclKind::Fun => SymbolKind::Function,
            DeclKind::Param => SymbolKind::Parameter,
        }
    }
}

/// Where a declaration came from. The type checker reads a function's
/// parameter list through this link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolOrigin {
    Node(NodeId),
    Builtin { params: &'static [ExpType] },
}

#[derive(Debug)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    pub kind: SymbolKind,
    pub ty: ExpType,
    pub scope: ScopeId,
    pub line: u32,
    pub slot: u32,
    pub origin: SymbolOrigin,
    /// Lines of every later use, in the order they were resolved.
    pub references: Vec<u32>,
}

/// Everything [`SymbolTable::declare`] needs besides the owning scope.
#[derive(Debug, Clone, Copy)]
pub struct Declaration<'a> {
    pub name: &'a str,
    pub kind: SymbolKind,
    pub ty: ExpType,
    pub line: u32,
    pub slot: u32,
    pub origin: SymbolOrigin,
}

#[derive(Debug)]
pub struct SymbolTable {
    arena: Arena<Symbol>,
    by_scope: HashMap<ScopeId, HashMap<String, SymbolId>>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            by_scope: HashMap::new(),
        }
    }

    pub fn declare(&mut self, scope: ScopeId, decl: Declaration<'_>) -> SymbolId {
        let id = self.arena.alloc_with_id(|id| Symbol {
            id,
            name: decl.name.to_string(),
            kind: decl.kind,
            ty: decl.ty,
            scope,
            line: decl.line,
            slot: decl.slot,
            origin: decl.origin,
            references: Vec::new(),
        });

        self.by_scope
            .entry(scope)
            .or_default()
            .insert(decl.name.to_string(), id);

        id
    }

    /// Resolves `name` from `scope` outward through its parents.
    pub fn lookup(&self, name: &str, scope: ScopeId, scopes: &ScopeTable) -> Option<SymbolId> {
        scopes
            .ancestors(scope)
            .find_map(|s| self.lookup_local(name, s.id))
    }

    /// Resolves `name` in `scope` only, never in its parents.
    pub fn lookup_local(&self, name: &str, scope: ScopeId) -> Option<SymbolId> {
        self.by_scope
            .get(&scope)
            .and_then(|symbols| symbols.get(name))
            .copied()
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.arena[id]
    }

    pub fn add_reference(&mut self, symbol_id: SymbolId, line: u32) {
        self.arena[symbol_id].references.push(line);
    }

    /// Declarations of `scope` in slot order.
    pub fn symbols_in_scope(&self, scope: ScopeId) -> impl Iterator<Item = &Symbol> {
        self.all_symbols().filter(move |s| s.scope == scope)
    }

    pub fn all_symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.arena.iter().map(|(_, s)| s)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::scope::{GLOBAL_SCOPE_NAME, ScopeKind};

    fn variable(name: &str, slot: u32) -> Declaration<'_> {
        Declaration {
            name,
            kind: SymbolKind::Variable,
            ty: ExpType::Integer,
            line: 1,
            slot,
            origin: SymbolOrigin::Builtin { params: &[] },
        }
    }

    fn global_table() -> (ScopeTable, ScopeId) {
        let mut scopes = ScopeTable::new();
        let global = scopes.create_scope(ScopeKind::Global, GLOBAL_SCOPE_NAME, None);
        (scopes, global)
    }

    #[test]
    fn register_symbol() {
        let (_, global) = global_table();
        let mut symbols = SymbolTable::new();
        let id = symbols.declare(global, variable("x", 0));

        let symbol = symbols.get(id);
        assert_eq!(symbol.name, "x");
        assert_eq!(symbol.kind, SymbolKind::Variable);
        assert_eq!(symbol.ty, ExpType::Integer);
        assert_eq!(symbol.scope, global);
        assert_eq!(symbol.slot, 0);
        assert!(symbol.references.is_empty());
    }

    #[test]
    fn lookup_in_parent_scope() {
        let (mut scopes, global) = global_table();
        let func = scopes.create_scope(ScopeKind::Function, "f", Some(global));
        let block = scopes.create_scope(ScopeKind::Block, "f", Some(func));

        let mut symbols = SymbolTable::new();
        let x = symbols.declare(global, variable("x", 0));

        assert_eq!(symbols.lookup("x", block, &scopes), Some(x));
        assert_eq!(symbols.lookup("x", func, &scopes), Some(x));
    }

    #[test]
    fn shadowing_returns_innermost() {
        let (mut scopes, global) = global_table();
        let func = scopes.create_scope(ScopeKind::Function, "f", Some(global));
        let block = scopes.create_scope(ScopeKind::Block, "f", Some(func));

        let mut symbols = SymbolTable::new();
        let outer = symbols.declare(global, variable("x", 0));
        let middle = symbols.declare(func, variable("x", 0));
        let inner = symbols.declare(block, variable("x", 0));

        assert_eq!(symbols.lookup("x", block, &scopes), Some(inner));
        assert_eq!(symbols.lookup("x", func, &scopes), Some(middle));
        assert_eq!(symbols.lookup("x", global, &scopes), Some(outer));
    }

    #[test]
    fn lookup_local_ignores_parents() {
        let (mut scopes, global) = global_table();
        let func = scopes.create_scope(ScopeKind::Function, "f", Some(global));

        let mut symbols = SymbolTable::new();
        let x = symbols.declare(global, variable("x", 0));

        assert_eq!(symbols.lookup_local("x", global), Some(x));
        assert_eq!(symbols.lookup_local("x", func), None);
        assert_eq!(symbols.lookup("x", func, &scopes), Some(x));
    }

    #[test]
    fn lookup_nonexistent_returns_none() {
        let (scopes, global) = global_table();
        let symbols = SymbolTable::new();
        assert!(symbols.lookup("undeclared", global, &scopes).is_none());
    }

    #[test]
    fn add_reference_tracks_usage_in_order() {
        let (_, global) = global_table();
        let mut symbols = SymbolTable::new();
        let id = symbols.declare(global, variable("x", 0));

        symbols.add_reference(id, 7);
        symbols.add_reference(id, 3);

        assert_eq!(symbols.get(id).references, vec![7, 3]);
    }

    #[test]
    fn symbols_in_scope_follow_declaration_order() {
        let (mut scopes, global) = global_table();
        let func = scopes.create_scope(ScopeKind::Function, "f", Some(global));

        let mut symbols = SymbolTable::new();
        symbols.declare(global, variable("b", 0));
        symbols.declare(func, variable("p", 0));
        symbols.declare(global, variable("a", 1));

        let global_names: Vec<&str> = symbols
            .symbols_in_scope(global)
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(global_names, vec!["b", "a"]);

        let func_names: Vec<&str> = symbols
            .symbols_in_scope(func)
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(func_names, vec!["p"]);
        assert_eq!(symbols.len(), 3);
    }

    #[test]
    fn symbol_kind_follows_declaration_kind() {
        assert_eq!(SymbolKind::from(DeclKind::Var), SymbolKind::Variable);
        assert_eq!(SymbolKind::from(DeclKind::Fun), SymbolKind::Function);
        assert_eq!(SymbolKind::from(DeclKind::Param), SymbolKind::Parameter);
    }
}
