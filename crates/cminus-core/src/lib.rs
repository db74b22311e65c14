//! Semantic analysis for the C-Minus teaching language.
//!
//! Takes the syntax tree a parser produced and runs two passes over it: the
//! declaration binder builds scopes and resolves names, the type checker
//! computes expression types. Both report through one diagnostic stream.

pub mod analysis;
pub mod config;
pub mod diagnostic;
pub mod report;
pub mod semantic;
pub mod syntax;
pub mod visitor;

pub use analysis::{AnalysisEngine, AnalysisError, analyze};
pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use semantic::SemanticModel;
pub use syntax::{SyntaxTree, TreeBuilder};
