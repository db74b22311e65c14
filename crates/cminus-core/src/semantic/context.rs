//! Shared state of the two analysis passes
//!
//! Both walks drive the same stack discipline through this type: the binder
//! creates scopes and pushes them, the checker pushes the scopes the binder
//! attached to each block. The current function name always equals the name
//! of the innermost active scope.

use std::mem;

use tracing::{debug, trace};

use super::SemanticModel;
use super::annotations::Annotations;
use super::scope::{GLOBAL_SCOPE_NAME, ScopeId, ScopeKind, ScopeTable};
use super::stack::ScopeStack;
use super::symbols::{Declaration, SymbolId, SymbolTable};
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::syntax::NodeId;

/// What the next compound block does when entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockEntry {
    /// Push a fresh scope for the block.
    #[default]
    FreshBlock,
    /// The block is a function body; the function's scope is already active.
    ReuseOwnerScope,
}

pub struct AnalysisContext {
    scopes: ScopeTable,
    symbols: SymbolTable,
    annotations: Annotations,
    diagnostics: Vec<Diagnostic>,
    stack: ScopeStack,
    global: ScopeId,
    function: String,
    block_entry: BlockEntry,
}

impl Default for AnalysisContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisContext {
    /// Creates the global scope and activates it.
    pub fn new() -> Self {
        let mut scopes = ScopeTable::new();
        let global = scopes.create_scope(ScopeKind::Global, GLOBAL_SCOPE_NAME, None);
        let mut stack = ScopeStack::new();
        stack.push(global);

        Self {
            scopes,
            symbols: SymbolTable::new(),
            annotations: Annotations::new(),
            diagnostics: Vec::new(),
            stack,
            global,
            function: GLOBAL_SCOPE_NAME.to_string(),
            block_entry: BlockEntry::FreshBlock,
        }
    }

    pub fn global(&self) -> ScopeId {
        self.global
    }

    pub fn scopes(&self) -> &ScopeTable {
        &self.scopes
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn annotations_mut(&mut self) -> &mut Annotations {
        &mut self.annotations
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn function_name(&self) -> &str {
        &self.function
    }

    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn top(&self) -> Option<ScopeId> {
        self.stack.top()
    }

    /// Creates a scope named after the current function, parented to the
    /// active scope, and pushes it.
    pub fn open_scope(&mut self, kind: ScopeKind) -> ScopeId {
        let parent = self.stack.top();
        let scope = self.scopes.create_scope(kind, &self.function, parent);
        debug!(scope = %self.function, ?kind, depth = self.stack.depth() + 1, "scope created");
        self.stack.push(scope);
        scope
    }

    /// Makes `name` the current function and opens its scope.
    pub fn enter_function(&mut self, name: &str) -> ScopeId {
        self.function = name.to_string();
        self.open_scope(ScopeKind::Function)
    }

    /// Re-activates a scope created earlier.
    pub fn push(&mut self, scope: ScopeId) {
        self.function = self.scopes.get(scope).name.clone();
        trace!(scope = %self.function, depth = self.stack.depth() + 1, "scope pushed");
        self.stack.push(scope);
    }

    /// Deactivates the innermost scope and restores the function name from
    /// the new top.
    pub fn pop(&mut self) -> Option<ScopeId> {
        let popped = self.stack.pop()?;
        if let Some(top) = self.stack.top() {
            self.function = self.scopes.get(top).name.clone();
        }
        trace!(scope = %self.function, depth = self.stack.depth(), "scope popped");
        Some(popped)
    }

    /// Resolves `name` from the innermost active scope outward.
    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        let top = self.stack.top()?;
        self.symbols.lookup(name, top, &self.scopes)
    }

    /// Resolves `name` in the innermost active scope only, and only when
    /// that scope is named `scope_name`.
    pub fn lookup_local(&self, scope_name: &str, name: &str) -> Option<SymbolId> {
        let top = self.stack.top()?;
        if self.scopes.get(top).name != scope_name {
            return None;
        }
        self.symbols.lookup_local(name, top)
    }

    /// Inserts a declaration into the innermost scope using its next slot.
    /// `decl.slot` is overwritten.
    pub fn declare(&mut self, node: Option<NodeId>, decl: Declaration<'_>) -> Option<SymbolId> {
        let scope = self.stack.top()?;
        let slot = self.stack.next_slot()?;
        let id = self.symbols.declare(scope, Declaration { slot, ..decl });
        if let Some(node) = node {
            self.annotations.record_declaration(node, id);
        }
        debug!(name = decl.name, ty = %decl.ty, slot, scope = %self.function, "declared");
        Some(id)
    }

    pub fn add_reference(&mut self, node: NodeId, symbol: SymbolId, line: u32) {
        self.symbols.add_reference(symbol, line);
        self.annotations.resolve(node, symbol);
    }

    pub fn report(&mut self, line: u32, kind: DiagnosticKind) {
        let diagnostic = Diagnostic::new(line, kind);
        debug!(code = diagnostic.code(), line, "{}", diagnostic.kind);
        self.diagnostics.push(diagnostic);
    }

    pub fn set_block_entry(&mut self, entry: BlockEntry) {
        self.block_entry = entry;
    }

    /// Returns the pending block state and resets it to `FreshBlock`.
    pub fn take_block_entry(&mut self) -> BlockEntry {
        mem::replace(&mut self.block_entry, BlockEntry::FreshBlock)
    }

    pub fn into_model(self) -> SemanticModel {
        SemanticModel {
            global: self.global,
            scopes: self.scopes,
            symbols: self.symbols,
            annotations: self.annotations,
            diagnostics: self.diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::symbols::{SymbolKind, SymbolOrigin};
    use crate::syntax::ExpType;

    fn int_var(name: &str) -> Declaration<'_> {
        Declaration {
            name,
            kind: SymbolKind::Variable,
            ty: ExpType::Integer,
            line: 1,
            slot: 0,
            origin: SymbolOrigin::Builtin { params: &[] },
        }
    }

    #[test]
    fn starts_in_global_scope() {
        let ctx = AnalysisContext::new();
        assert_eq!(ctx.top(), Some(ctx.global()));
        assert_eq!(ctx.depth(), 1);
        assert_eq!(ctx.function_name(), "Global");
    }

    #[test]
    fn function_scope_takes_function_name_and_parent() {
        let mut ctx = AnalysisContext::new();
        let f = ctx.enter_function("f");
        let block = ctx.open_scope(ScopeKind::Block);

        assert_eq!(ctx.scopes().get(f).name, "f");
        assert_eq!(ctx.scopes().get(f).parent, Some(ctx.global()));
        assert_eq!(ctx.scopes().get(block).name, "f");
        assert_eq!(ctx.scopes().get(block).parent, Some(f));
    }

    #[test]
    fn pop_restores_function_name() {
        let mut ctx = AnalysisContext::new();
        ctx.enter_function("f");
        assert_eq!(ctx.function_name(), "f");

        ctx.pop();
        assert_eq!(ctx.function_name(), "Global");
        assert_eq!(ctx.depth(), 1);
    }

    #[test]
    fn push_reactivates_recorded_scope() {
        let mut ctx = AnalysisContext::new();
        let f = ctx.enter_function("f");
        ctx.pop();

        ctx.push(f);
        assert_eq!(ctx.top(), Some(f));
        assert_eq!(ctx.function_name(), "f");
    }

    #[test]
    fn declare_assigns_slots_per_scope() {
        let mut ctx = AnalysisContext::new();
        let a = ctx.declare(None, int_var("a")).unwrap();
        let b = ctx.declare(None, int_var("b")).unwrap();
        ctx.enter_function("f");
        let c = ctx.declare(None, int_var("c")).unwrap();

        assert_eq!(ctx.symbols().get(a).slot, 0);
        assert_eq!(ctx.symbols().get(b).slot, 1);
        assert_eq!(ctx.symbols().get(c).slot, 0);
    }

    #[test]
    fn lookup_local_requires_matching_scope_name() {
        let mut ctx = AnalysisContext::new();
        let x = ctx.declare(None, int_var("x")).unwrap();

        assert_eq!(ctx.lookup_local("Global", "x"), Some(x));
        assert_eq!(ctx.lookup_local("main", "x"), None);

        ctx.enter_function("main");
        assert_eq!(ctx.lookup_local("main", "x"), None);
        assert_eq!(ctx.lookup("x"), Some(x));
    }

    #[test]
    fn block_entry_is_consumed_once() {
        let mut ctx = AnalysisContext::new();
        ctx.set_block_entry(BlockEntry::ReuseOwnerScope);

        assert_eq!(ctx.take_block_entry(), BlockEntry::ReuseOwnerScope);
        assert_eq!(ctx.take_block_entry(), BlockEntry::FreshBlock);
    }

    #[test]
    fn report_records_in_order() {
        let mut ctx = AnalysisContext::new();
        ctx.report(
            2,
            DiagnosticKind::UndeclaredIdentifier {
                name: "y".to_string(),
            },
        );
        ctx.report(
            1,
            DiagnosticKind::DuplicateDeclaration {
                name: "x".to_string(),
            },
        );

        let lines: Vec<u32> = ctx.diagnostics().iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![2, 1]);
    }
}
