//! Write cost summaries to an Excel workbook

use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use super::{CostTotals, summary_rows};
use crate::ingest::costs::MonthlyCostSummary;

mod sheets {
    pub const SUMMARY: &str = "Summary";
    pub const SHOPPING: &str = "Shopping";
    pub const STAFF: &str = "Staff Meals";
}

const SUMMARY_HEADER: [&str; 11] = [
    "Month",
    "Previous Stock",
    "Std Total Collection",
    "Teacher Collection",
    "Total Cost",
    "Total Meals Served",
    "Guest Taka",
    "Per Meal Cost",
    "Current Stock",
    "Others",
    "Shopping",
];

/// One summary row per month plus a totals row, and one sheet each for the
/// shopping and staff meal entries
pub fn write_cost_report(summaries: &[&MonthlyCostSummary], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let summary_sheet = workbook.add_worksheet();
    summary_sheet.set_name(sheets::SUMMARY)?;
    write_header(summary_sheet, &SUMMARY_HEADER, &bold)?;
    for (idx, summary) in summaries.iter().enumerate() {
        let row = (idx + 1) as u32;
        summary_sheet.write_string(row, 0, &summary.accounted_month)?;
        write_values(summary_sheet, row, &summary_rows(summary))?;
    }
    // Stock and per-meal columns stay blank in the totals row
    let total_row = (summaries.len() + 1) as u32;
    summary_sheet.write_string_with_format(total_row, 0, "Total", &bold)?;
    let totals = CostTotals::from_summaries(summaries.iter().copied());
    write_values(summary_sheet, total_row, &totals.rows())?;

    let shopping_sheet = workbook.add_worksheet();
    shopping_sheet.set_name(sheets::SHOPPING)?;
    write_header(shopping_sheet, &["Month", "Date", "Amount"], &bold)?;
    let mut row = 1u32;
    for summary in summaries {
        for entry in &summary.shopping_entries {
            shopping_sheet.write_string(row, 0, &summary.accounted_month)?;
            shopping_sheet.write_string(row, 1, &entry.date)?;
            shopping_sheet.write_number(row, 2, entry.amount)?;
            row += 1;
        }
    }

    let staff_sheet = workbook.add_worksheet();
    staff_sheet.set_name(sheets::STAFF)?;
    write_header(
        staff_sheet,
        &["Month", "Name", "Designation", "Total Meals", "Per Meal Cost", "Total Cost"],
        &bold,
    )?;
    let mut row = 1u32;
    for summary in summaries {
        for entry in summary.teacher_meal_entries() {
            staff_sheet.write_string(row, 0, &summary.accounted_month)?;
            staff_sheet.write_string(row, 1, &entry.name)?;
            staff_sheet.write_string(row, 2, &entry.designation)?;
            staff_sheet.write_number(row, 3, entry.total_meals)?;
            staff_sheet.write_number(row, 4, entry.per_meal_cost)?;
            staff_sheet.write_number(row, 5, entry.total_cost)?;
            row += 1;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to save Excel file: {}", path.display()))?;
    log::info!("Wrote {} cost summaries to {}", summaries.len(), path.display());

    Ok(())
}

fn write_header(ws: &mut Worksheet, columns: &[&str], bold: &Format) -> Result<()> {
    for (col, name) in columns.iter().enumerate() {
        ws.write_string_with_format(0, col as u16, *name, bold)?;
    }
    Ok(())
}

/// Write each value under the summary column carrying its label
fn write_values(ws: &mut Worksheet, row: u32, values: &[(&str, f64)]) -> Result<()> {
    for (label, value) in values {
        if let Some(col) = SUMMARY_HEADER.iter().position(|name| name == label) {
            ws.write_number(row, col as u16, *value)?;
        }
    }
    Ok(())
}
