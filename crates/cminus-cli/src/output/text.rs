//! Plain text output, one line per diagnostic

use colored::Colorize;
use cminus_core::diagnostic::{Diagnostic, Severity};
use cminus_core::report::SymbolReport;

use super::TreeReport;

pub struct TextFormatter {
    show_symbols: bool,
}

impl TextFormatter {
    pub fn new(show_symbols: bool) -> Self {
        Self { show_symbols }
    }

    pub fn format(&self, reports: &[TreeReport]) -> String {
        let mut out = String::new();

        for report in reports {
            for diag in &report.model.diagnostics {
                out.push_str(&format_diagnostic(&report.path, diag));
                out.push('\n');
            }

            if self.show_symbols {
                out.push('\n');
                out.push_str(&format!("{} {}\n", "Symbol table of".bold(), report.path));
                out.push_str(&SymbolReport::from_model(&report.model).to_string());
                out.push('\n');
            }
        }

        out.push_str(&format_summary(reports));
        out
    }
}

fn format_diagnostic(path: &str, diag: &Diagnostic) -> String {
    let label = match diag.severity() {
        Severity::SymbolError => diag.severity().label().yellow().bold(),
        Severity::TypeError => diag.severity().label().red().bold(),
    };
    format!(
        "{}: {} at line {}: {} [{}]",
        path,
        label,
        diag.line,
        diag.message(),
        diag.code().dimmed()
    )
}

fn format_summary(reports: &[TreeReport]) -> String {
    let symbol_errors: usize = reports
        .iter()
        .map(|r| r.model.count(Severity::SymbolError))
        .sum();
    let type_errors: usize = reports
        .iter()
        .map(|r| r.model.count(Severity::TypeError))
        .sum();

    if symbol_errors + type_errors == 0 {
        return format!(
            "{}\n",
            format!("No errors found in {} tree(s)", reports.len()).green()
        );
    }

    format!(
        "\nFound {} symbol error(s) and {} type error(s) in {} tree(s)\n",
        symbol_errors,
        type_errors,
        reports.len()
    )
}
