//! Semantic analysis: scopes, symbols and types
//!
//! Pass 1 ([`binder`]) builds the scope table and resolves names, pass 2
//! ([`checker`]) types expressions. Both run over one [`AnalysisContext`].

pub mod annotations;
pub mod binder;
pub mod checker;
pub mod context;
pub mod scope;
pub mod stack;
pub mod symbols;

pub use annotations::Annotations;
pub use binder::{BUILTINS, Builtin};
pub use context::{AnalysisContext, BlockEntry};
pub use scope::{GLOBAL_SCOPE_NAME, Scope, ScopeId, ScopeKind, ScopeTable};
pub use stack::ScopeStack;
pub use symbols::{Symbol, SymbolId, SymbolKind, SymbolOrigin, SymbolTable};

use crate::diagnostic::{Diagnostic, Severity};

/// Everything the analysis produced for one tree.
#[derive(Debug)]
pub struct SemanticModel {
    pub global: ScopeId,
    pub scopes: ScopeTable,
    pub symbols: SymbolTable,
    pub annotations: Annotations,
    pub diagnostics: Vec<Diagnostic>,
}

impl SemanticModel {
    pub fn global_scope(&self) -> ScopeId {
        self.global
    }

    pub fn has_type_errors(&self) -> bool {
        self.count(Severity::TypeError) > 0
    }

    pub fn has_symbol_errors(&self) -> bool {
        self.count(Severity::SymbolError) > 0
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() == severity)
            .count()
    }

    /// Declarations named `name`, across all scopes, in declaration order.
    pub fn symbols_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Symbol> {
        self.symbols.all_symbols().filter(move |s| s.name == name)
    }
}
