pub mod ingest;
pub mod inspect;
pub mod report;

use std::path::Path;

use anyhow::{Context, Result};
use colored::*;

use crate::ingest::RowFormatError;
use crate::workbook::{WorkbookTable, read_workbook};

/// Read and parse a workbook file
pub fn load_workbook(path: &Path) -> Result<WorkbookTable> {
    if !path.exists() {
        anyhow::bail!("Workbook does not exist: {}", path.display());
    }
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read workbook: {}", path.display()))?;
    let table = read_workbook(&bytes)
        .with_context(|| format!("Failed to parse workbook: {}", path.display()))?;
    log::debug!("Parsed {} sheets from {}", table.len(), path.display());
    Ok(table)
}

pub fn print_diagnostics(diagnostics: &[RowFormatError]) {
    if diagnostics.is_empty() {
        return;
    }
    println!();
    println!("{} {} rows skipped:", "!".yellow().bold(), diagnostics.len());
    for diagnostic in diagnostics {
        println!("  {}", diagnostic.to_string().yellow());
    }
}

/// Amounts with two decimals, whole amounts without
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}
