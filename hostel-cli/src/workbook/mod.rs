//! Workbook reading
//!
//! Turns uploaded workbook bytes into a [`WorkbookTable`]: every sheet as an
//! ordered list of [`RowRecord`]s keyed by the sheet's own header row.
//!
//! Header labels follow the usual sheet-to-records convention:
//! - A blank header cell becomes `__EMPTY`
//! - Repeated labels get a numeric suffix (`__EMPTY_1`, `Name_1`, ...)
//! - Rows with no values at all are skipped

mod row;

pub use row::{CellValue, RowRecord};

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};

/// Label given to columns whose header cell is blank
pub const EMPTY_HEADER: &str = "__EMPTY";

/// All sheets of one parsed workbook
#[derive(Debug, Clone, Default)]
pub struct WorkbookTable {
    /// Sheet names in workbook order
    names: Vec<String>,
    sheets: HashMap<String, Vec<RowRecord>>,
}

impl WorkbookTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a sheet
    pub fn insert_sheet(&mut self, name: impl Into<String>, rows: Vec<RowRecord>) {
        let name = name.into();
        if !self.sheets.contains_key(&name) {
            self.names.push(name.clone());
        }
        self.sheets.insert(name, rows);
    }

    pub fn sheet(&self, name: &str) -> Option<&[RowRecord]> {
        self.sheets.get(name).map(Vec::as_slice)
    }

    pub fn sheet_names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

/// Parse workbook bytes (xlsx, xlsm, xlsb, xls or ods) into a [`WorkbookTable`]
pub fn read_workbook(bytes: &[u8]) -> Result<WorkbookTable, calamine::Error> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let mut table = WorkbookTable::new();
    for sheet_name in workbook.sheet_names() {
        let range = match workbook.worksheet_range(&sheet_name) {
            Ok(range) => range,
            Err(e) => {
                // Chart sheets and similar have no cell range
                log::warn!("Skipping sheet '{}': {}", sheet_name, e);
                continue;
            }
        };

        let rows = range_to_records(&range);
        log::debug!("Read sheet '{}' with {} data rows", sheet_name, rows.len());
        table.insert_sheet(sheet_name, rows);
    }

    Ok(table)
}

/// Convert a cell range into records, using its first row as the header
pub fn range_to_records(range: &Range<Data>) -> Vec<RowRecord> {
    let first_line = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => header_labels(header_row),
        None => return Vec::new(),
    };

    let mut records = Vec::new();
    for (offset, row) in rows.enumerate() {
        // Header is `first_line`, data starts right after it
        let mut record = RowRecord::new(first_line + offset + 1);
        for (col_idx, cell) in row.iter().enumerate() {
            let Some(label) = headers.get(col_idx) else {
                continue;
            };
            if let Some(value) = CellValue::from_data(cell) {
                record.insert(label.clone(), value);
            }
        }

        if !record.is_empty() {
            records.push(record);
        }
    }

    records
}

/// Build unique column labels from a header row
pub fn header_labels(header_row: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut labels = Vec::with_capacity(header_row.len());

    for cell in header_row {
        let base = CellValue::from_data(cell)
            .map(|value| value.to_string())
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| EMPTY_HEADER.to_string());

        let label = match seen.get(&base).copied() {
            None => {
                seen.insert(base.clone(), 1);
                base
            }
            Some(mut counter) => {
                let mut candidate = format!("{}_{}", base, counter);
                counter += 1;
                while seen.contains_key(&candidate) {
                    candidate = format!("{}_{}", base, counter);
                    counter += 1;
                }
                seen.insert(base, counter);
                seen.insert(candidate.clone(), 1);
                candidate
            }
        };
        labels.push(label);
    }

    labels
}
