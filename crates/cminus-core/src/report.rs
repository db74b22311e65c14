//! Symbol table report
//!
//! Flattens the scope table into one row per declaration: scopes in
//! creation order, declarations in slot order. The line list starts with
//! the declaration line, followed by every reference.

use std::fmt;

use crate::semantic::{SemanticModel, SymbolKind};
use crate::syntax::ExpType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRow {
    pub name: String,
    pub kind: SymbolKind,
    pub ty: ExpType,
    pub slot: u32,
    pub scope: String,
    /// Nesting depth of the owning scope, 0 for the global scope.
    pub depth: usize,
    pub lines: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SymbolReport {
    pub rows: Vec<SymbolRow>,
}

impl SymbolReport {
    pub fn from_model(model: &SemanticModel) -> Self {
        let mut rows = Vec::with_capacity(model.symbols.len());
        for scope in model.scopes.iter() {
            let depth = model.scopes.ancestors(scope.id).count() - 1;
            for symbol in model.symbols.symbols_in_scope(scope.id) {
                let mut lines = Vec::with_capacity(symbol.references.len() + 1);
                lines.push(symbol.line);
                lines.extend(&symbol.references);

                rows.push(SymbolRow {
                    name: symbol.name.clone(),
                    kind: symbol.kind,
                    ty: symbol.ty,
                    slot: symbol.slot,
                    scope: scope.name.clone(),
                    depth,
                    lines,
                });
            }
        }
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

const HEADERS: [&str; 5] = ["Name", "Type", "Slot", "Scope", "Lines"];

impl fmt::Display for SymbolReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<[String; 5]> = self
            .rows
            .iter()
            .map(|row| {
                let lines: Vec<String> = row.lines.iter().map(u32::to_string).collect();
                [
                    row.name.clone(),
                    row.ty.to_string(),
                    row.slot.to_string(),
                    row.scope.clone(),
                    lines.join(", "),
                ]
            })
            .collect();

        let mut widths = HEADERS.map(str::len);
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        write_row(f, &HEADERS.map(String::from), &widths)?;
        write_row(f, &widths.map(|w| "-".repeat(w)), &widths)?;
        for row in &cells {
            write_row(f, row, &widths)?;
        }
        Ok(())
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, cells: &[String; 5], widths: &[usize; 5]) -> fmt::Result {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if i + 1 == cells.len() {
            line.push_str(cell);
        } else {
            line.push_str(&format!("{cell:<width$}  "));
        }
    }
    writeln!(f, "{}", line.trim_end())
}
