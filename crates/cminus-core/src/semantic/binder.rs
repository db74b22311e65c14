//! Declaration binder (pass 1)
//!
//! Opens a scope for every function and nested block, inserts declarations
//! with their slots, and resolves each identifier use against the active
//! scopes. The scope of every compound block is recorded in the annotations
//! so the type checker can re-enter it.

use std::convert::Infallible;
use std::ops::ControlFlow;

use tracing::info;

use super::context::{AnalysisContext, BlockEntry};
use super::scope::ScopeKind;
use super::symbols::{Declaration, SymbolKind, SymbolOrigin};
use crate::analysis::AnalysisError;
use crate::diagnostic::DiagnosticKind;
use crate::syntax::{Decl, DeclKind, ExpType, Node, NodeKind, StmtKind, SyntaxTree};
use crate::visitor::{TreeVisitor, VisitorContext, walk_tree};

/// A function the language provides without a declaration in the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Builtin {
    pub name: &'static str,
    pub return_type: ExpType,
    pub params: &'static [ExpType],
}

pub const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "input",
        return_type: ExpType::Integer,
        params: &[],
    },
    Builtin {
        name: "output",
        return_type: ExpType::Void,
        params: &[ExpType::Integer],
    },
];

/// Inserts [`BUILTINS`] into the active scope at line 0.
pub fn declare_builtins(ctx: &mut AnalysisContext) {
    for builtin in BUILTINS {
        ctx.declare(
            None,
            Declaration {
                name: builtin.name,
                kind: SymbolKind::Function,
                ty: builtin.return_type,
                line: 0,
                slot: 0,
                origin: SymbolOrigin::Builtin {
                    params: builtin.params,
                },
            },
        );
    }
}

/// Runs pass 1 over `tree`. The context must sit at the global scope.
pub fn bind(tree: &SyntaxTree, ctx: &mut AnalysisContext) -> Result<(), AnalysisError> {
    let visitor_ctx = VisitorContext::new(tree);
    let mut binder = Binder { ctx };
    match walk_tree(&visitor_ctx, &mut binder) {
        ControlFlow::Continue(()) => {}
        ControlFlow::Break(never) => match never {},
    }

    let depth = binder.ctx.depth();
    if depth != 1 {
        return Err(AnalysisError::UnbalancedScopes { depth });
    }

    info!(
        scopes = binder.ctx.scopes().len(),
        symbols = binder.ctx.symbols().len(),
        diagnostics = binder.ctx.diagnostics().len(),
        "binding finished"
    );
    Ok(())
}

struct Binder<'c> {
    ctx: &'c mut AnalysisContext,
}

impl Binder<'_> {
    fn declare(&mut self, node: &Node, decl: &Decl) {
        match decl.kind {
            DeclKind::Fun => {
                self.insert_unique(node, decl);
                self.ctx.enter_function(&decl.name);
                self.ctx.set_block_entry(BlockEntry::ReuseOwnerScope);
            }
            DeclKind::Var => self.insert_unique(node, decl),
            // A void parameter spells an empty parameter list.
            DeclKind::Param if decl.ty == ExpType::Void => {}
            DeclKind::Param => self.insert_unique(node, decl),
        }
    }

    fn insert_unique(&mut self, node: &Node, decl: &Decl) {
        let function = self.ctx.function_name().to_string();
        if self.ctx.lookup_local(&function, &decl.name).is_some() {
            self.ctx.report(
                node.line,
                DiagnosticKind::DuplicateDeclaration {
                    name: decl.name.clone(),
                },
            );
            return;
        }

        self.ctx.declare(
            Some(node.id),
            Declaration {
                name: &decl.name,
                kind: decl.kind.into(),
                ty: decl.ty,
                line: node.line,
                slot: 0,
                origin: SymbolOrigin::Node(node.id),
            },
        );
    }

    fn enter_block(&mut self, node: &Node) {
        let scope = match self.ctx.take_block_entry() {
            BlockEntry::ReuseOwnerScope => self.ctx.top(),
            BlockEntry::FreshBlock => Some(self.ctx.open_scope(ScopeKind::Block)),
        };
        if let Some(scope) = scope {
            self.ctx.annotations_mut().bind_scope(node.id, scope);
        }
    }

    fn resolve(&mut self, node: &Node, name: &str) {
        match self.ctx.lookup(name) {
            Some(symbol) => self.ctx.add_reference(node.id, symbol, node.line),
            None => self.ctx.report(
                node.line,
                DiagnosticKind::UndeclaredIdentifier {
                    name: name.to_string(),
                },
            ),
        }
    }
}

impl TreeVisitor<Infallible> for Binder<'_> {
    fn enter(&mut self, node: &Node, _ctx: &VisitorContext) -> ControlFlow<Infallible> {
        match &node.kind {
            NodeKind::Decl(decl) => self.declare(node, decl),
            NodeKind::Stmt(StmtKind::Compound) => self.enter_block(node),
            NodeKind::Expr(expr) => {
                if let Some(name) = expr.name() {
                    self.resolve(node, name);
                }
            }
            NodeKind::Stmt(_) => {}
        }
        ControlFlow::Continue(())
    }

    fn leave(&mut self, node: &Node, _ctx: &VisitorContext) -> ControlFlow<Infallible> {
        match &node.kind {
            NodeKind::Stmt(StmtKind::Compound) => {
                self.ctx.pop();
            }
            // A function without a body never consumed its scope.
            NodeKind::Decl(Decl {
                kind: DeclKind::Fun,
                ..
            }) => {
                if self.ctx.take_block_entry() == BlockEntry::ReuseOwnerScope {
                    self.ctx.pop();
                }
            }
            _ => {}
        }
        ControlFlow::Continue(())
    }
}
