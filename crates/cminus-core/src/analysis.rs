//! Analysis engine running both semantic passes
//!
//! Provides the entry point for the CLI and other consumers. Each call
//! starts from a fresh [`AnalysisContext`], so one engine can analyze any
//! number of trees, including from several threads at once.

use tracing::info;

use crate::config::Config;
use crate::semantic::binder::{bind, declare_builtins};
use crate::semantic::checker::check;
use crate::semantic::{AnalysisContext, SemanticModel};
use crate::syntax::SyntaxTree;

/// A broken contract between the passes. Unlike diagnostics, these mean the
/// analysis itself could not be completed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("compound block at line {line} has no scope recorded by the binder")]
    MissingBlockScope { line: u32 },
    #[error("scope stack ended at depth {depth} instead of the global scope")]
    UnbalancedScopes { depth: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub builtins: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self { builtins: true }
    }
}

#[derive(Debug, Default)]
pub struct AnalysisEngine {
    options: AnalysisOptions,
}

impl AnalysisEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &Config) -> Self {
        Self {
            options: AnalysisOptions {
                builtins: config.analysis.builtins,
            },
        }
    }

    pub fn options(&self) -> AnalysisOptions {
        self.options
    }

    /// Binds then type-checks `tree`. Diagnostics are part of the returned
    /// model; `Err` only reports a broken pass contract.
    pub fn analyze(&self, tree: &SyntaxTree) -> Result<SemanticModel, AnalysisError> {
        let mut ctx = AnalysisContext::new();
        if self.options.builtins {
            declare_builtins(&mut ctx);
        }

        bind(tree, &mut ctx)?;
        check(tree, &mut ctx)?;

        let model = ctx.into_model();
        info!(
            nodes = tree.len(),
            scopes = model.scopes.len(),
            diagnostics = model.diagnostics.len(),
            "analysis finished"
        );
        Ok(model)
    }
}

/// Analyzes `tree` with default options.
pub fn analyze(tree: &SyntaxTree) -> Result<SemanticModel, AnalysisError> {
    AnalysisEngine::new().analyze(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::syntax::{ExpType, TreeBuilder};

    fn call_input() -> SyntaxTree {
        // void main(void) { input(); }
        let mut b = TreeBuilder::new();
        let params = b.void_params(1);
        let call = b.call(2, "input", &[]);
        let body = b.compound(1, &[], &[call]);
        let main = b.fun(1, "main", ExpType::Void, &[params], body);
        b.finish(&[main])
    }

    #[test]
    fn builtins_are_declared_by_default() {
        let model = analyze(&call_input()).unwrap();

        assert!(model.diagnostics.is_empty());
        assert_eq!(model.symbols_named("input").count(), 1);
        assert_eq!(model.symbols_named("output").count(), 1);
    }

    #[test]
    fn builtins_can_be_disabled() {
        let config = Config {
            analysis: AnalysisConfig { builtins: false },
            ..Config::default()
        };
        let engine = AnalysisEngine::with_config(&config);
        let model = engine.analyze(&call_input()).unwrap();

        assert!(!engine.options().builtins);
        assert!(model.has_symbol_errors());
        assert!(!model.has_type_errors());
    }

    #[test]
    fn each_run_starts_fresh() {
        let engine = AnalysisEngine::new();
        let tree = call_input();

        let first = engine.analyze(&tree).unwrap();
        let second = engine.analyze(&tree).unwrap();

        assert_eq!(first.scopes.len(), second.scopes.len());
        assert_eq!(first.symbols.len(), second.symbols.len());
        let input = second.symbols_named("input").next().unwrap();
        assert_eq!(input.references, vec![2]);
    }

    #[test]
    fn empty_program_has_only_global_scope() {
        let model = analyze(&TreeBuilder::new().finish(&[])).unwrap();

        assert_eq!(model.scopes.len(), 1);
        assert_eq!(model.symbols.len(), 2);
        assert!(model.diagnostics.is_empty());
    }
}
