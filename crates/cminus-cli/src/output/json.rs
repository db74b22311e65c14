//! JSON output formatter for programmatic consumers

use cminus_core::diagnostic::{Diagnostic, Severity};
use cminus_core::report::{SymbolReport, SymbolRow};
use serde::Serialize;

use super::TreeReport;

#[derive(Serialize)]
pub struct JsonOutput {
    pub version: &'static str,
    pub metadata: JsonMetadata,
    pub summary: JsonSummary,
    pub trees: Vec<JsonTree>,
}

#[derive(Serialize)]
pub struct JsonMetadata {
    pub cminus_version: &'static str,
    pub working_directory: String,
}

#[derive(Serialize)]
pub struct JsonSummary {
    pub total_trees: usize,
    pub trees_with_errors: usize,
    pub total_diagnostics: usize,
    pub by_severity: SeverityCounts,
}

#[derive(Serialize)]
pub struct SeverityCounts {
    pub symbol: usize,
    #[serde(rename = "type")]
    pub type_: usize,
}

#[derive(Serialize)]
pub struct JsonTree {
    pub path: String,
    pub has_symbol_errors: bool,
    pub has_type_errors: bool,
    pub diagnostics: Vec<JsonDiagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbols: Option<Vec<JsonSymbol>>,
}

#[derive(Serialize)]
pub struct JsonDiagnostic {
    pub code: &'static str,
    pub name: &'static str,
    pub severity: &'static str,
    pub line: u32,
    pub message: String,
}

#[derive(Serialize)]
pub struct JsonSymbol {
    pub name: String,
    pub kind: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub slot: u32,
    pub scope: String,
    pub depth: usize,
    pub lines: Vec<u32>,
}

pub struct JsonFormatter {
    show_symbols: bool,
}

impl JsonFormatter {
    pub fn new(show_symbols: bool) -> Self {
        Self { show_symbols }
    }

    pub fn format(&self, reports: &[TreeReport]) -> String {
        let output = self.build_output(reports);
        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }

    fn build_output(&self, reports: &[TreeReport]) -> JsonOutput {
        JsonOutput {
            version: "1.0",
            metadata: build_metadata(),
            summary: build_summary(reports),
            trees: reports.iter().map(|r| self.convert_tree(r)).collect(),
        }
    }

    fn convert_tree(&self, report: &TreeReport) -> JsonTree {
        let symbols = self.show_symbols.then(|| {
            SymbolReport::from_model(&report.model)
                .rows
                .iter()
                .map(convert_symbol)
                .collect()
        });

        JsonTree {
            path: report.path.clone(),
            has_symbol_errors: report.model.has_symbol_errors(),
            has_type_errors: report.model.has_type_errors(),
            diagnostics: report
                .model
                .diagnostics
                .iter()
                .map(convert_diagnostic)
                .collect(),
            symbols,
        }
    }
}

fn build_metadata() -> JsonMetadata {
    JsonMetadata {
        cminus_version: env!("CARGO_PKG_VERSION"),
        working_directory: std::env::current_dir()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default(),
    }
}

fn build_summary(reports: &[TreeReport]) -> JsonSummary {
    let mut by_severity = SeverityCounts { symbol: 0, type_: 0 };
    let mut trees_with_errors = 0;

    for report in reports {
        let symbol = report.model.count(Severity::SymbolError);
        let type_ = report.model.count(Severity::TypeError);
        by_severity.symbol += symbol;
        by_severity.type_ += type_;
        if symbol + type_ > 0 {
            trees_with_errors += 1;
        }
    }

    JsonSummary {
        total_trees: reports.len(),
        trees_with_errors,
        total_diagnostics: by_severity.symbol + by_severity.type_,
        by_severity,
    }
}

fn convert_diagnostic(diag: &Diagnostic) -> JsonDiagnostic {
    JsonDiagnostic {
        code: diag.code(),
        name: diag.kind.name(),
        severity: diag.severity().as_str(),
        line: diag.line,
        message: diag.message(),
    }
}

fn convert_symbol(row: &SymbolRow) -> JsonSymbol {
    JsonSymbol {
        name: row.name.clone(),
        kind: format!("{:?}", row.kind).to_lowercase(),
        ty: row.ty.to_string(),
        slot: row.slot,
        scope: row.scope.clone(),
        depth: row.depth,
        lines: row.lines.clone(),
    }
}
