//! Output formatters for analysis results

pub mod json;
pub mod text;

use cminus_core::SemanticModel;

/// The analysis result of one syntax tree file.
#[derive(Debug)]
pub struct TreeReport {
    pub path: String,
    pub model: SemanticModel,
}
