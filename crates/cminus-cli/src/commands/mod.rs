//! CLI command implementations

pub mod check;
pub mod explain;

pub use check::CheckArgs;
pub use explain::ExplainArgs;

use clap::Subcommand;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze one or more C-Minus syntax trees
    Check(CheckArgs),

    /// Show detailed explanation for a diagnostic code
    Explain(ExplainArgs),
}
