//! Student roster and meal fee imports from the `Students` sheet

use rand::Rng;
use serde::Serialize;
use serde_json::Value;

use super::RowFormatError;
use super::gateway::PersistenceGateway;
use super::layout::StudentSheetLayout;
use crate::api::GatewayError;
use crate::workbook::{CellValue, RowRecord};

const STUDENT_ID_LEN: usize = 6;
const STUDENT_ID_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A new student document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<CellValue>,
    pub email: String,
    pub student_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institute: Option<CellValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<CellValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<CellValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<CellValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<CellValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<CellValue>,
}

impl StudentRecord {
    fn from_row(row: &RowRecord, layout: &StudentSheetLayout, email: String, student_id: String) -> Self {
        let cell = |column: &str| row.get(column).cloned();
        Self {
            name: cell(&layout.name_column),
            email,
            student_id,
            institute: cell(&layout.department_column),
            number: cell(&layout.number_column),
            semester: cell(&layout.semester_column),
            room: cell(&layout.room_column),
            user_id: cell(&layout.user_id_column),
            photo: cell(&layout.photo_column),
        }
    }
}

/// A new hostel meal fee document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealFeeRecord {
    pub student_id: String,
    pub meal_fee: f64,
    /// Fixed hostel fee plus the meal fee
    pub total_fee: f64,
    /// JSON text of the row's transactions
    #[serde(rename = "transaction_history")]
    pub transaction_history: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentRunReport {
    /// Emails of newly created students
    pub created: Vec<String>,
    /// Emails that already had a student document
    pub existing: Vec<String>,
    pub diagnostics: Vec<RowFormatError>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MealFeeRunReport {
    pub created: Vec<MealFeeRecord>,
    pub diagnostics: Vec<RowFormatError>,
}

/// Six upper-case base-36 characters
pub fn generate_student_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..STUDENT_ID_LEN)
        .map(|_| STUDENT_ID_CHARSET[rng.random_range(0..STUDENT_ID_CHARSET.len())] as char)
        .collect()
}

/// Create a student document for every row whose email is not yet known.
///
/// Existing students are left untouched.
pub async fn import_students(
    gateway: &PersistenceGateway<'_>,
    rows: &[RowRecord],
    layout: &StudentSheetLayout,
) -> Result<StudentRunReport, GatewayError> {
    let mut report = StudentRunReport::default();

    for row in rows {
        let Some(email) = row.text(&layout.email_column) else {
            report.diagnostics.push(row_error(layout, row, "no email".to_string()));
            continue;
        };

        if gateway.find_student_by_email(&email).await?.is_some() {
            log::debug!("Student {} already exists", email);
            report.existing.push(email);
            continue;
        }

        let student_id = generate_student_id(&mut rand::rng());
        let student = StudentRecord::from_row(row, layout, email.clone(), student_id);
        gateway.create_student_document(&student).await?;
        log::info!("Created student {} ({})", student.email, student.student_id);
        report.created.push(email);
    }

    for diagnostic in &report.diagnostics {
        log::warn!("Skipping student row: {}", diagnostic);
    }
    Ok(report)
}

/// Create one meal fee document per student row
pub async fn import_meal_fees(
    gateway: &PersistenceGateway<'_>,
    rows: &[RowRecord],
    layout: &StudentSheetLayout,
    hostel_fixed_fee: f64,
) -> Result<MealFeeRunReport, GatewayError> {
    let mut report = MealFeeRunReport::default();

    for row in rows {
        let fee = match meal_fee_record(row, layout, hostel_fixed_fee) {
            Ok(fee) => fee,
            Err(diagnostic) => {
                log::warn!("Skipping meal fee row: {}", diagnostic);
                report.diagnostics.push(diagnostic);
                continue;
            }
        };

        gateway.create_meal_fee_document(&fee).await?;
        log::info!("Meal fee for {}: {}", fee.student_id, fee.total_fee);
        report.created.push(fee);
    }

    Ok(report)
}

fn meal_fee_record(
    row: &RowRecord,
    layout: &StudentSheetLayout,
    hostel_fixed_fee: f64,
) -> Result<MealFeeRecord, RowFormatError> {
    let student_id = row
        .text(&layout.student_id_column)
        .ok_or_else(|| row_error(layout, row, "no studentId".to_string()))?;

    let meal_fee = match row.get(&layout.meal_fee_column) {
        None => return Err(row_error(layout, row, "no meal_fee".to_string())),
        Some(cell) => cell.as_number().ok_or_else(|| {
            row_error(layout, row, format!("meal_fee '{}' is not numeric", cell))
        })?,
    };

    Ok(MealFeeRecord {
        student_id,
        meal_fee,
        total_fee: hostel_fixed_fee + meal_fee,
        transaction_history: transactions_text(row.get(&layout.transactions_column)),
    })
}

/// Transactions cell as JSON text. Cells already holding JSON are kept as
/// that JSON; anything else is stored as a JSON value of the cell.
fn transactions_text(cell: Option<&CellValue>) -> String {
    match cell {
        None => "[]".to_string(),
        Some(CellValue::Text(text)) => match serde_json::from_str::<Value>(text) {
            Ok(value) => value.to_string(),
            Err(_) => Value::String(text.clone()).to_string(),
        },
        Some(other) => other.to_json().to_string(),
    }
}

fn row_error(layout: &StudentSheetLayout, row: &RowRecord, message: String) -> RowFormatError {
    RowFormatError {
        sheet: layout.sheet.clone(),
        line: row.line,
        message,
    }
}
