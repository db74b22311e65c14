//! Check command - analyzes C-Minus syntax trees

use crate::output::TreeReport;
use crate::output::json::JsonFormatter;
use crate::output::text::TextFormatter;
use anyhow::{Context, Result};
use clap::Args;
use cminus_core::analysis::AnalysisEngine;
use cminus_core::config::discover_config;
use cminus_core::syntax::json::load_tree;
use colored::Colorize;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Syntax tree files (JSON) to analyze
    #[arg(value_name = "TREE", required = true)]
    pub trees: Vec<PathBuf>,

    /// Output format for diagnostics (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Print the symbol table of every tree
    #[arg(long)]
    pub symbols: bool,

    /// Fail on symbol errors as well as type errors (exit code 1)
    #[arg(long)]
    pub fail_on_symbol_errors: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl CheckArgs {
    pub fn run(&self) -> Result<()> {
        self.configure_colors();
        let format = self.parse_format()?;

        let start_dir = config_start_dir(&self.trees);
        let config_result = discover_config(&start_dir)?;
        for warning in &config_result.warnings {
            eprintln!("{} {}", "warning:".yellow().bold(), warning);
        }
        if let Some(path) = &config_result.path {
            debug!(path = %path.display(), "loaded configuration");
        }
        let config = config_result.config;

        let engine = AnalysisEngine::with_config(&config);
        let reports = analyze_trees(&engine, &self.trees)?;

        let show_symbols = self.symbols || config.report.symbols;
        match format {
            OutputFormat::Json => println!("{}", JsonFormatter::new(show_symbols).format(&reports)),
            OutputFormat::Text => print!("{}", TextFormatter::new(show_symbols).format(&reports)),
        }

        let fail_on_symbol_errors = self.fail_on_symbol_errors || config.gate.fail_on_symbol_errors;
        if gate_failed(&reports, fail_on_symbol_errors) {
            process::exit(1);
        }

        Ok(())
    }

    fn parse_format(&self) -> Result<OutputFormat> {
        match self.format.as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => anyhow::bail!("Invalid format '{}'. Valid values: text, json", other),
        }
    }

    fn configure_colors(&self) {
        let no_color_env = std::env::var("NO_COLOR").is_ok();
        if self.no_color || no_color_env {
            colored::control::set_override(false);
        }
    }
}

/// The config is searched for from the directory of the first tree.
fn config_start_dir(trees: &[PathBuf]) -> PathBuf {
    trees
        .first()
        .and_then(|path| path.parent())
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Trees are analyzed in parallel; reports keep the command-line order.
fn analyze_trees(engine: &AnalysisEngine, paths: &[PathBuf]) -> Result<Vec<TreeReport>> {
    paths
        .par_iter()
        .map(|path| -> Result<TreeReport> {
            let tree = load_tree(path)
                .with_context(|| format!("Failed to load syntax tree {}", path.display()))?;
            let model = engine
                .analyze(&tree)
                .with_context(|| format!("Analysis of {} did not complete", path.display()))?;
            Ok(TreeReport {
                path: path.display().to_string(),
                model,
            })
        })
        .collect()
}

/// Type errors always fail the run; symbol errors only when asked to.
fn gate_failed(reports: &[TreeReport], fail_on_symbol_errors: bool) -> bool {
    reports.iter().any(|report| {
        report.model.has_type_errors()
            || (fail_on_symbol_errors && report.model.has_symbol_errors())
    })
}
