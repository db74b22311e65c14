//! Explain command - describes a diagnostic code

use clap::Args;
use cminus_core::diagnostic::{CATALOG, DiagnosticInfo, Severity};
use colored::Colorize;

#[derive(Args, Debug)]
pub struct ExplainArgs {
    #[arg(
        value_name = "CODE",
        help = "Diagnostic code or name to explain (e.g., \"T003\", \"UndeclaredIdentifier\")"
    )]
    pub code: String,
}

impl ExplainArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        match DiagnosticInfo::find(&self.code) {
            Some(info) => {
                print!("{}", render(info));
                Ok(())
            }
            None => {
                eprintln!(
                    "{} unknown diagnostic '{}'",
                    "error:".red().bold(),
                    self.code
                );
                eprintln!();
                eprintln!("Available diagnostics:");
                for info in CATALOG {
                    eprintln!("  {} ({})", info.code, info.name);
                }

                std::process::exit(1);
            }
        }
    }
}

fn render(info: &DiagnosticInfo) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!("{}\n\n", format!("Diagnostic {}", info.code).bold()));
    out.push_str(&format!("  {}: {}\n", "Name".cyan(), info.name));
    out.push_str(&format!("  {}: {}\n", "Severity".cyan(), format_severity(info.severity)));
    out.push_str(&format!("  {}: {}\n", "Description".cyan(), info.description));
    out.push('\n');
    out.push_str(&format!("  {}:\n", "Example".cyan()));
    for line in info.example.lines() {
        out.push_str(&format!("    {}\n", line));
    }
    out.push('\n');
    out
}

fn format_severity(severity: Severity) -> String {
    match severity {
        Severity::SymbolError => severity.label().yellow().to_string(),
        Severity::TypeError => severity.label().red().to_string(),
    }
}
