//! Monthly meal-cost summary from the cost sheet and the staff meal sheet

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::RowFormatError;
use super::layout::{CostSheetLayout, StaffSheetLayout};
use super::serial_date::{format_us_date, from_serial};
use crate::workbook::RowRecord;

/// Accounted month used when the staff sheet carries no "Month of ..." title
pub const UNKNOWN_MONTH: &str = "Unknown Month";

/// Designation given to staff rows that leave it blank
const UNKNOWN_DESIGNATION: &str = "Unknown";

static MONTH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Month of ([A-Za-z]+),(\d{4})").unwrap());

/// Summary rows recognized in the cost sheet's label column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CostLabel {
    PreviousStock,
    StdTotalCollection,
    TotalCost,
    GuestTaka,
    PerMealCost,
    TotalMeal,
    CurrentStock,
    Others,
}

static LABELS: Lazy<HashMap<&'static str, CostLabel>> = Lazy::new(|| {
    CostLabel::ALL
        .iter()
        .map(|label| (label.as_str(), *label))
        .collect()
});

impl CostLabel {
    pub const ALL: [CostLabel; 8] = [
        CostLabel::PreviousStock,
        CostLabel::StdTotalCollection,
        CostLabel::TotalCost,
        CostLabel::GuestTaka,
        CostLabel::PerMealCost,
        CostLabel::TotalMeal,
        CostLabel::CurrentStock,
        CostLabel::Others,
    ];

    /// Exact, case-sensitive lookup of a label cell
    pub fn classify(text: &str) -> Option<Self> {
        LABELS.get(text).copied()
    }

    /// Text of the label as it appears in the sheet
    pub fn as_str(&self) -> &'static str {
        match self {
            CostLabel::PreviousStock => "Previous Stock",
            CostLabel::StdTotalCollection => "Std Total Collection",
            CostLabel::TotalCost => "Total Cost",
            CostLabel::GuestTaka => "Guest Taka",
            CostLabel::PerMealCost => "Per Meal Cost",
            CostLabel::TotalMeal => "Total Meal",
            CostLabel::CurrentStock => "Current Stock",
            CostLabel::Others => "Others",
        }
    }
}

/// One dated shopping expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingEntry {
    pub date: String,
    pub amount: f64,
}

/// Meals taken by one staff member in the accounted month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherMealEntry {
    pub name: String,
    pub designation: String,
    pub total_meals: f64,
    pub per_meal_cost: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyCostSummary {
    /// `<Month>-<Year>`, or [`UNKNOWN_MONTH`]
    pub accounted_month: String,
    pub previous_stock: f64,
    pub std_total_collection: f64,
    teacher_collection: f64,
    pub total_cost: f64,
    pub total_meals_served: f64,
    pub guest_taka: f64,
    pub per_meal_cost: f64,
    pub current_stock: f64,
    pub others: f64,
    pub shopping_entries: Vec<ShoppingEntry>,
    teacher_meal_entries: Vec<TeacherMealEntry>,
}

impl MonthlyCostSummary {
    pub fn new(accounted_month: impl Into<String>) -> Self {
        Self {
            accounted_month: accounted_month.into(),
            previous_stock: 0.0,
            std_total_collection: 0.0,
            teacher_collection: 0.0,
            total_cost: 0.0,
            total_meals_served: 0.0,
            guest_taka: 0.0,
            per_meal_cost: 0.0,
            current_stock: 0.0,
            others: 0.0,
            shopping_entries: Vec::new(),
            teacher_meal_entries: Vec::new(),
        }
    }

    /// Sum of meals over the staff entries
    pub fn teacher_collection(&self) -> f64 {
        self.teacher_collection
    }

    pub fn teacher_meal_entries(&self) -> &[TeacherMealEntry] {
        &self.teacher_meal_entries
    }

    /// Append a staff entry, keeping the meal sum in step
    pub fn push_teacher_meal(&mut self, entry: TeacherMealEntry) {
        self.teacher_collection += entry.total_meals;
        self.teacher_meal_entries.push(entry);
    }

    /// Restore a summary whose teacher collection was stored separately
    pub(crate) fn with_stored_teacher_collection(mut self, teacher_collection: f64) -> Self {
        self.teacher_collection = teacher_collection;
        self
    }

    fn set(&mut self, label: CostLabel, value: f64) {
        let field = match label {
            CostLabel::PreviousStock => &mut self.previous_stock,
            CostLabel::StdTotalCollection => &mut self.std_total_collection,
            CostLabel::TotalCost => &mut self.total_cost,
            CostLabel::GuestTaka => &mut self.guest_taka,
            CostLabel::PerMealCost => &mut self.per_meal_cost,
            CostLabel::TotalMeal => &mut self.total_meals_served,
            CostLabel::CurrentStock => &mut self.current_stock,
            CostLabel::Others => &mut self.others,
        };
        *field = value;
    }
}

/// Summary plus the rows that were dropped on the way
#[derive(Debug, Clone, PartialEq)]
pub struct CostAggregation {
    pub summary: MonthlyCostSummary,
    pub diagnostics: Vec<RowFormatError>,
}

/// Fold the cost sheet and the staff sheet into one monthly summary.
///
/// Labeled rows set their field, later rows overwriting earlier ones.
/// Unlabeled rows with both cells filled are shopping entries. Staff rows
/// are read after the cost sheet so each entry carries the final per-meal
/// cost.
pub fn aggregate_costs(
    cost_rows: &[RowRecord],
    staff_rows: &[RowRecord],
    cost_layout: &CostSheetLayout,
    staff_layout: &StaffSheetLayout,
) -> CostAggregation {
    let mut summary = MonthlyCostSummary::new(accounted_month(staff_rows, staff_layout));
    let mut diagnostics = Vec::new();

    for row in cost_rows {
        let label_cell = row.get(&cost_layout.label_column);
        let value_cell = row.get(&cost_layout.value_column);

        if let Some(label) = label_cell.and_then(|cell| cell.as_text()).and_then(CostLabel::classify) {
            let value = value_cell.and_then(|cell| cell.as_number()).unwrap_or(0.0);
            log::debug!("{}: {}", label.as_str(), value);
            summary.set(label, value);
            continue;
        }

        let (Some(date_cell), Some(amount_cell)) = (label_cell, value_cell) else {
            continue;
        };

        let date = date_cell.as_number().and_then(from_serial);
        let amount = amount_cell.as_number();
        match (date, amount) {
            (Some(date), Some(amount)) => summary.shopping_entries.push(ShoppingEntry {
                date: format_us_date(date),
                amount,
            }),
            (None, _) => diagnostics.push(row_error(
                cost_layout,
                row,
                format!("'{}' is not a serial date", date_cell),
            )),
            (Some(_), None) => diagnostics.push(row_error(
                cost_layout,
                row,
                format!("amount '{}' is not numeric", amount_cell),
            )),
        }
    }

    for row in staff_rows {
        let Some(name) = row.text(&staff_layout.name_column) else {
            continue;
        };
        summary.push_teacher_meal(TeacherMealEntry {
            name,
            designation: row
                .text(&staff_layout.designation_column)
                .unwrap_or_else(|| UNKNOWN_DESIGNATION.to_string()),
            total_meals: row.number_or_zero(&staff_layout.meals_column),
            per_meal_cost: summary.per_meal_cost,
            total_cost: row.number_or_zero(&staff_layout.cost_column),
        });
    }

    for diagnostic in &diagnostics {
        log::warn!("Skipping shopping row: {}", diagnostic);
    }
    log::info!(
        "Aggregated {}: {} shopping entries, {} staff entries, teacher collection {}",
        summary.accounted_month,
        summary.shopping_entries.len(),
        summary.teacher_meal_entries.len(),
        summary.teacher_collection
    );

    CostAggregation {
        summary,
        diagnostics,
    }
}

/// `<Month>-<Year>` from the title cell of the staff sheet's first row
pub fn accounted_month(staff_rows: &[RowRecord], layout: &StaffSheetLayout) -> String {
    staff_rows
        .first()
        .and_then(|row| row.get(&layout.month_column))
        .and_then(|cell| cell.as_text())
        .and_then(|title| MONTH_PATTERN.captures(title))
        .map(|caps| format!("{}-{}", &caps[1], &caps[2]))
        .unwrap_or_else(|| UNKNOWN_MONTH.to_string())
}

fn row_error(layout: &CostSheetLayout, row: &RowRecord, message: String) -> RowFormatError {
    RowFormatError {
        sheet: layout.sheet.clone(),
        line: row.line,
        message,
    }
}
