//! Sheet names and column labels of the office workbook
//!
//! The workbook has no declared schema; everything is positional. Columns
//! without a header cell are addressed by their synthetic `__EMPTY*` label.

use serde::{Deserialize, Serialize};

/// Where each aggregator finds its data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    pub rooms: RoomSheetLayout,
    pub costs: CostSheetLayout,
    pub staff: StaffSheetLayout,
    pub students: StudentSheetLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomSheetLayout {
    pub sheet: String,
    pub room_column: String,
    pub student_column: String,
}

impl Default for RoomSheetLayout {
    fn default() -> Self {
        Self {
            sheet: "Sheet2".to_string(),
            room_column: "__EMPTY".to_string(),
            student_column: "__EMPTY_2".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostSheetLayout {
    pub sheet: String,
    /// Holds either a summary label or a serial date
    pub label_column: String,
    /// Holds the labeled figure or the shopping amount
    pub value_column: String,
}

impl Default for CostSheetLayout {
    fn default() -> Self {
        Self {
            sheet: "Sheet3".to_string(),
            label_column: "Date".to_string(),
            value_column: "Shopping".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffSheetLayout {
    pub sheet: String,
    /// Header of the title column; its first value carries "Month of <Month>,<Year>"
    pub month_column: String,
    pub designation_column: String,
    pub name_column: String,
    pub meals_column: String,
    pub cost_column: String,
}

impl Default for StaffSheetLayout {
    fn default() -> Self {
        Self {
            sheet: "Sheet1".to_string(),
            month_column: "ICST Teacher's & Stuffs".to_string(),
            designation_column: "__EMPTY".to_string(),
            name_column: "__EMPTY_1".to_string(),
            meals_column: "__EMPTY_2".to_string(),
            cost_column: "__EMPTY_5".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentSheetLayout {
    pub sheet: String,
    pub name_column: String,
    pub email_column: String,
    pub student_id_column: String,
    pub department_column: String,
    pub number_column: String,
    pub semester_column: String,
    pub room_column: String,
    pub user_id_column: String,
    pub photo_column: String,
    pub meal_fee_column: String,
    pub transactions_column: String,
}

impl Default for StudentSheetLayout {
    fn default() -> Self {
        Self {
            sheet: "Students".to_string(),
            name_column: "name".to_string(),
            email_column: "email".to_string(),
            student_id_column: "studentId".to_string(),
            department_column: "Dept".to_string(),
            number_column: "number".to_string(),
            semester_column: "semester".to_string(),
            room_column: "room".to_string(),
            user_id_column: "userId".to_string(),
            photo_column: "photo".to_string(),
            meal_fee_column: "meal_fee".to_string(),
            transactions_column: "transactions".to_string(),
        }
    }
}
