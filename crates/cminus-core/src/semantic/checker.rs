//! Type checker (pass 2)
//!
//! Re-enters the scopes the binder recorded, computes a type for every
//! expression bottom-up and validates statements against the enclosing
//! function. An expression whose operands are unset (an earlier failure)
//! stays unset itself and is not checked again.

use std::ops::ControlFlow;

use tracing::info;

use super::context::{AnalysisContext, BlockEntry};
use super::symbols::{SymbolKind, SymbolOrigin};
use crate::analysis::AnalysisError;
use crate::diagnostic::{DiagnosticKind, Severity};
use crate::syntax::{DeclKind, ExpType, ExprKind, Node, NodeKind, Operator, StmtKind, SyntaxTree};
use crate::visitor::{TreeVisitor, VisitorContext, walk_tree};

/// Runs pass 2 over `tree`. Requires the annotations produced by
/// [`bind`](super::binder::bind) for the same tree.
pub fn check(tree: &SyntaxTree, ctx: &mut AnalysisContext) -> Result<(), AnalysisError> {
    let visitor_ctx = VisitorContext::new(tree);
    let mut checker = Checker {
        ctx,
        function: None,
    };

    if let ControlFlow::Break(err) = walk_tree(&visitor_ctx, &mut checker) {
        return Err(err);
    }

    let depth = checker.ctx.depth();
    if depth != 1 {
        return Err(AnalysisError::UnbalancedScopes { depth });
    }

    let type_errors = checker
        .ctx
        .diagnostics()
        .iter()
        .filter(|d| d.severity() == Severity::TypeError)
        .count();
    info!(
        typed = checker.ctx.annotations().typed_nodes(),
        type_errors, "type checking finished"
    );
    Ok(())
}

/// The function whose body is being checked.
struct FunctionFrame {
    name: String,
    return_type: ExpType,
}

struct Checker<'c> {
    ctx: &'c mut AnalysisContext,
    function: Option<FunctionFrame>,
}

impl Checker<'_> {
    fn enter_function(&mut self, node: &Node, name: &str, return_type: ExpType) -> Result<(), AnalysisError> {
        self.function = Some(FunctionFrame {
            name: name.to_string(),
            return_type,
        });

        if let Some(body) = node.child(1) {
            let scope = self
                .ctx
                .annotations()
                .scope_of(body)
                .ok_or(AnalysisError::MissingBlockScope { line: node.line })?;
            self.ctx.push(scope);
            self.ctx.set_block_entry(BlockEntry::ReuseOwnerScope);
        }
        Ok(())
    }

    fn enter_block(&mut self, node: &Node) -> Result<(), AnalysisError> {
        if self.ctx.take_block_entry() == BlockEntry::FreshBlock {
            let scope = self
                .ctx
                .annotations()
                .scope_of(node.id)
                .ok_or(AnalysisError::MissingBlockScope { line: node.line })?;
            self.ctx.push(scope);
        }
        Ok(())
    }

    fn resolved_type(&self, node: &Node) -> Option<ExpType> {
        let symbol = self.ctx.annotations().resolution(node.id)?;
        Some(self.ctx.symbols().get(symbol).ty)
    }

    fn check_expr(&mut self, node: &Node, expr: &ExprKind, vctx: &VisitorContext) {
        let ty = match expr {
            ExprKind::Const(_) => Some(ExpType::Integer),
            ExprKind::Id(_) => self.resolved_type(node),
            ExprKind::ArrayId(name) => self.check_index(node, name, vctx),
            ExprKind::Call(name) => self.check_call(node, name, vctx),
            ExprKind::Op(op) => self.check_op(node, *op, vctx),
        };
        if let Some(ty) = ty {
            self.ctx.annotations_mut().set_type(node.id, ty);
        }
    }

    fn check_index(&mut self, node: &Node, name: &str, vctx: &VisitorContext) -> Option<ExpType> {
        self.resolved_type(node)?;
        if let Some(index) = node.child(0) {
            match self.ctx.annotations().type_of(index) {
                Some(ExpType::Integer) | None => {}
                Some(found) => {
                    let line = vctx.node(index).line;
                    self.ctx.report(
                        line,
                        DiagnosticKind::IndexTypeError {
                            name: name.to_string(),
                            found,
                        },
                    );
                    return None;
                }
            }
        }
        Some(ExpType::Integer)
    }

    fn check_call(&mut self, node: &Node, name: &str, vctx: &VisitorContext) -> Option<ExpType> {
        let symbol_id = self.ctx.annotations().resolution(node.id)?;
        let symbol = self.ctx.symbols().get(symbol_id);
        if symbol.kind != SymbolKind::Function {
            return None;
        }
        let return_type = symbol.ty;

        let params: Vec<ExpType> = match symbol.origin {
            SymbolOrigin::Builtin { params } => params.to_vec(),
            SymbolOrigin::Node(fun) => vctx
                .list(vctx.node(fun), 0)
                .filter_map(|n| n.decl())
                .filter(|d| d.kind == DeclKind::Param && d.ty != ExpType::Void)
                .map(|d| d.ty)
                .collect(),
        };

        let args: Vec<(u32, Option<ExpType>)> = vctx
            .list(node, 0)
            .map(|arg| (arg.line, self.ctx.annotations().type_of(arg.id)))
            .collect();

        // Arguments and parameters are paired up one position at a time;
        // the first failure ends the check for this call.
        let (expected, found) = (params.len(), args.len());
        let mut args = args.into_iter();
        let mut params = params.into_iter();
        let mut position = 0;
        loop {
            position += 1;
            let (line, kind) = match (args.next(), params.next()) {
                (None, None) => break,
                (Some(_), None) | (None, Some(_)) => (
                    node.line,
                    DiagnosticKind::ArityMismatch {
                        callee: name.to_string(),
                        expected,
                        found,
                    },
                ),
                (Some((_, None)), Some(_)) => continue,
                (Some((line, Some(ExpType::Void))), Some(_)) => (
                    line,
                    DiagnosticKind::VoidArgument {
                        callee: name.to_string(),
                        position,
                    },
                ),
                (Some((line, Some(found))), Some(expected)) if found != expected => (
                    line,
                    DiagnosticKind::ArgTypeMismatch {
                        callee: name.to_string(),
                        position,
                        expected,
                        found,
                    },
                ),
                (Some(_), Some(_)) => continue,
            };
            self.ctx.report(line, kind);
            break;
        }

        Some(return_type)
    }

    fn check_op(&mut self, node: &Node, op: Operator, vctx: &VisitorContext) -> Option<ExpType> {
        let left = vctx.node(node.child(0)?);
        let right = vctx.node(node.child(1)?);
        let left_ty = self.ctx.annotations().type_of(left.id);
        let right_ty = self.ctx.annotations().type_of(right.id);

        let mut void_operand = false;
        for (side, ty) in [(left, left_ty), (right, right_ty)] {
            if ty == Some(ExpType::Void) {
                self.ctx.report(side.line, DiagnosticKind::VoidOperand { op });
                void_operand = true;
            }
        }
        if void_operand {
            return None;
        }

        let (left_ty, right_ty) = (left_ty?, right_ty?);
        let mismatch = DiagnosticKind::OperandTypeMismatch {
            op,
            left: left_ty,
            right: right_ty,
        };

        if op == Operator::Assign {
            if left_ty != right_ty {
                self.ctx.report(left.line, mismatch);
                return None;
            }
            return Some(left_ty);
        }

        let any_array = left_ty == ExpType::Array || right_ty == ExpType::Array;
        let (line, kind) = match (left_ty, right_ty, op) {
            (ExpType::Array, ExpType::Array, _) => (node.line, DiagnosticKind::ArrayArrayOp { op }),
            (ExpType::Integer, ExpType::Array, Operator::Minus) => {
                (node.line, DiagnosticKind::ArrayArithmetic { op })
            }
            (_, _, Operator::Times | Operator::Over) if any_array => {
                (node.line, DiagnosticKind::ArrayArithmetic { op })
            }
            _ if left_ty != right_ty => (left.line, mismatch),
            _ => return Some(ExpType::Integer),
        };
        self.ctx.report(line, kind);
        None
    }

    fn check_condition(&mut self, node: &Node, stmt: StmtKind, vctx: &VisitorContext) {
        let Some(condition) = node.child(0) else {
            return;
        };
        if self.ctx.annotations().type_of(condition) == Some(ExpType::Void) {
            self.ctx.report(
                vctx.node(condition).line,
                DiagnosticKind::VoidCondition {
                    statement: stmt.keyword(),
                },
            );
        }
    }

    fn check_return(&mut self, node: &Node) {
        let Some(function) = &self.function else {
            return;
        };
        let expected = function.return_type;

        let found = match node.child(0) {
            None => None,
            Some(value) => match self.ctx.annotations().type_of(value) {
                Some(ty) => Some(ty),
                None => return,
            },
        };

        let valid = match (expected, found) {
            (ExpType::Void, None | Some(ExpType::Void)) => true,
            (ExpType::Void, Some(_)) => false,
            (_, None) => false,
            (expected, Some(found)) => expected == found,
        };

        if !valid {
            let function = function.name.clone();
            self.ctx.report(
                node.line,
                DiagnosticKind::ReturnTypeMismatch {
                    function,
                    expected,
                    found,
                },
            );
        }
    }
}

impl TreeVisitor<AnalysisError> for Checker<'_> {
    fn enter(&mut self, node: &Node, _ctx: &VisitorContext) -> ControlFlow<AnalysisError> {
        let entered = match &node.kind {
            NodeKind::Decl(decl) if decl.kind == DeclKind::Fun => {
                self.enter_function(node, &decl.name, decl.ty)
            }
            NodeKind::Stmt(StmtKind::Compound) => self.enter_block(node),
            _ => Ok(()),
        };
        match entered {
            Ok(()) => ControlFlow::Continue(()),
            Err(err) => ControlFlow::Break(err),
        }
    }

    fn leave(&mut self, node: &Node, ctx: &VisitorContext) -> ControlFlow<AnalysisError> {
        match &node.kind {
            NodeKind::Stmt(StmtKind::Compound) => {
                self.ctx.pop();
            }
            NodeKind::Stmt(stmt @ (StmtKind::If | StmtKind::While)) => {
                self.check_condition(node, *stmt, ctx);
            }
            NodeKind::Stmt(StmtKind::Return) => self.check_return(node),
            NodeKind::Expr(expr) => self.check_expr(node, expr, ctx),
            NodeKind::Decl(decl) if decl.kind == DeclKind::Fun => {
                self.function = None;
            }
            NodeKind::Decl(_) => {}
        }
        ControlFlow::Continue(())
    }
}
