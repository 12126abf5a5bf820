//! Workbook ingestion
//!
//! Each run reads one sheet set out of a parsed [`WorkbookTable`], folds it
//! into aggregate records and hands those to the [`PersistenceGateway`],
//! one awaited call at a time in sheet order.

pub mod costs;
pub mod gateway;
pub mod layout;
pub mod rooms;
pub mod roster;
pub mod serial_date;

use thiserror::Error;

use crate::api::GatewayError;
use crate::workbook::{RowRecord, WorkbookTable};
use costs::{MonthlyCostSummary, aggregate_costs};
use gateway::PersistenceGateway;
use layout::SheetLayout;
use rooms::{RoomRunReport, aggregate_rooms, apply_room_occupancy};
use roster::{MealFeeRunReport, StudentRunReport, import_meal_fees, import_students};

/// Failure that stops an ingestion run
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read workbook: {0}")]
    Parse(#[from] calamine::Error),

    #[error("sheet '{sheet}' not found in workbook")]
    MissingSheet { sheet: String },

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// A row that was dropped; the run carries on without it
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{sheet} row {line}: {message}")]
pub struct RowFormatError {
    pub sheet: String,
    pub line: usize,
    pub message: String,
}

/// Result of a cost ingestion run
#[derive(Debug, Clone, PartialEq)]
pub struct CostRunReport {
    pub document_id: String,
    pub summary: MonthlyCostSummary,
    pub diagnostics: Vec<RowFormatError>,
}

/// Rows of a sheet the run cannot do without
pub fn require_sheet<'a>(table: &'a WorkbookTable, sheet: &str) -> Result<&'a [RowRecord], IngestError> {
    table.sheet(sheet).ok_or_else(|| IngestError::MissingSheet {
        sheet: sheet.to_string(),
    })
}

/// Reset and rewrite the occupancy of every room listed in the room sheet
pub async fn ingest_rooms(
    table: &WorkbookTable,
    layout: &SheetLayout,
    gateway: &PersistenceGateway<'_>,
) -> Result<RoomRunReport, IngestError> {
    let rows = require_sheet(table, &layout.rooms.sheet)?;
    let rooms = aggregate_rooms(rows, &layout.rooms);
    log::info!("Found {} rooms in '{}'", rooms.len(), layout.rooms.sheet);

    Ok(apply_room_occupancy(gateway, &rooms).await?)
}

/// Aggregate the month's costs and store them as a new summary document.
///
/// Both the cost sheet and the staff sheet must be present; nothing is
/// written otherwise.
pub async fn ingest_costs(
    table: &WorkbookTable,
    layout: &SheetLayout,
    gateway: &PersistenceGateway<'_>,
) -> Result<CostRunReport, IngestError> {
    let cost_rows = require_sheet(table, &layout.costs.sheet)?;
    let staff_rows = require_sheet(table, &layout.staff.sheet)?;

    let aggregation = aggregate_costs(cost_rows, staff_rows, &layout.costs, &layout.staff);
    let document_id = gateway
        .create_cost_summary_document(&aggregation.summary)
        .await?;
    log::info!(
        "Stored cost summary {} for {}",
        document_id,
        aggregation.summary.accounted_month
    );

    Ok(CostRunReport {
        document_id,
        summary: aggregation.summary,
        diagnostics: aggregation.diagnostics,
    })
}

pub async fn ingest_students(
    table: &WorkbookTable,
    layout: &SheetLayout,
    gateway: &PersistenceGateway<'_>,
) -> Result<StudentRunReport, IngestError> {
    let rows = require_sheet(table, &layout.students.sheet)?;
    Ok(import_students(gateway, rows, &layout.students).await?)
}

pub async fn ingest_meal_fees(
    table: &WorkbookTable,
    layout: &SheetLayout,
    hostel_fixed_fee: f64,
    gateway: &PersistenceGateway<'_>,
) -> Result<MealFeeRunReport, IngestError> {
    let rows = require_sheet(table, &layout.students.sheet)?;
    Ok(import_meal_fees(gateway, rows, &layout.students, hostel_fixed_fee).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::MemoryStore;
    use crate::config::Collections;
    use crate::workbook::read_workbook;
    use rust_xlsxwriter::Workbook;
    use serde_json::json;

    /// Office workbook with a staff sheet, a room sheet and a cost sheet
    fn office_workbook() -> WorkbookTable {
        let mut workbook = Workbook::new();

        let staff = workbook.add_worksheet();
        staff.set_name("Sheet1").unwrap();
        staff.write_string(0, 0, "ICST Teacher's & Stuffs").unwrap();
        staff.write_string(1, 0, "Month of March,2023").unwrap();
        staff.write_string(2, 1, "Lecturer").unwrap();
        staff.write_string(2, 2, "Rahim").unwrap();
        staff.write_number(2, 3, 20.0).unwrap();
        staff.write_number(2, 6, 1000.0).unwrap();

        let rooms = workbook.add_worksheet();
        rooms.set_name("Sheet2").unwrap();
        rooms.write_string(0, 1, "Room No").unwrap();
        rooms.write_number(1, 0, 101.0).unwrap();
        rooms.write_string(1, 3, "Alice").unwrap();
        rooms.write_string(2, 3, "Bob").unwrap();
        rooms.write_number(3, 0, 102.0).unwrap();
        rooms.write_string(3, 3, "Carol").unwrap();

        let costs = workbook.add_worksheet();
        costs.set_name("Sheet3").unwrap();
        costs.write_string(0, 0, "Date").unwrap();
        costs.write_string(0, 1, "Shopping").unwrap();
        costs.write_string(1, 0, "Previous Stock").unwrap();
        costs.write_number(1, 1, 500.0).unwrap();
        costs.write_string(2, 0, "Total Cost").unwrap();
        costs.write_number(2, 1, 12000.0).unwrap();
        costs.write_number(3, 0, 45000.0).unwrap();
        costs.write_number(3, 1, 300.0).unwrap();
        costs.write_string(4, 0, "Per Meal Cost").unwrap();
        costs.write_number(4, 1, 50.0).unwrap();

        read_workbook(&workbook.save_to_buffer().unwrap()).unwrap()
    }

    #[test]
    fn test_office_workbook_labels() {
        let table = office_workbook();
        let staff = table.sheet("Sheet1").unwrap();
        // Header row: A is titled, B..G are blank
        assert_eq!(staff[1].text("__EMPTY").as_deref(), Some("Lecturer"));
        assert_eq!(staff[1].text("__EMPTY_1").as_deref(), Some("Rahim"));
        assert_eq!(staff[1].number_or_zero("__EMPTY_2"), 20.0);
        assert_eq!(staff[1].number_or_zero("__EMPTY_5"), 1000.0);

        let rooms = table.sheet("Sheet2").unwrap();
        assert_eq!(rooms[0].text("__EMPTY").as_deref(), Some("101"));
        assert_eq!(rooms[0].text("__EMPTY_2").as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_ingest_rooms_end_to_end() {
        let store = MemoryStore::new();
        let room_101 = store.seed("rooms", json!({"room_number": "101", "occupied_seats": 4}));
        let room_102 = store.seed("rooms", json!({"room_number": "102"}));
        let collections = Collections::default();
        let gateway = PersistenceGateway::new(&store, &collections);

        let report = ingest_rooms(&office_workbook(), &SheetLayout::default(), &gateway)
            .await
            .unwrap();

        assert_eq!(report.updated.len(), 2);
        assert!(report.missing.is_empty());
        let first = store.document("rooms", &room_101).unwrap();
        assert_eq!(first.get("occupied_seats"), Some(&json!(2)));
        assert_eq!(first.get("student_in_room"), Some(&json!(["Alice", "Bob"])));
        let second = store.document("rooms", &room_102).unwrap();
        assert_eq!(second.get("student_in_room"), Some(&json!(["Carol"])));
    }

    #[tokio::test]
    async fn test_ingest_costs_twice_creates_two_summaries() {
        let store = MemoryStore::new();
        let collections = Collections::default();
        let gateway = PersistenceGateway::new(&store, &collections);
        let table = office_workbook();
        let layout = SheetLayout::default();

        let first = ingest_costs(&table, &layout, &gateway).await.unwrap();
        let second = ingest_costs(&table, &layout, &gateway).await.unwrap();

        assert_ne!(first.document_id, second.document_id);
        assert_eq!(store.documents("management_costs").len(), 2);

        let summary = &first.summary;
        assert_eq!(summary.accounted_month, "March-2023");
        assert_eq!(summary.previous_stock, 500.0);
        assert_eq!(summary.total_cost, 12000.0);
        assert_eq!(summary.shopping_entries[0].date, "3/15/2023");
        assert_eq!(summary.teacher_collection(), 20.0);

        let stored = &store.documents("management_costs")[0];
        assert_eq!(stored.get("accounted_month"), Some(&json!("March-2023")));
        assert_eq!(stored.get("perMealCost"), Some(&json!(50.0)));
    }

    #[tokio::test]
    async fn test_failed_room_write_stops_the_run_without_rollback() {
        let store = MemoryStore::new();
        let room_101 = store.seed("rooms", json!({"room_number": "101"}));
        let room_102 = store.seed("rooms", json!({"room_number": "102", "occupied_seats": 3}));
        let collections = Collections::default();
        let gateway = PersistenceGateway::new(&store, &collections);

        // 0: reset 101, 1: write 101, 2: reset 102, 3: write 102
        store.fail_on(3);
        let result = ingest_rooms(&office_workbook(), &SheetLayout::default(), &gateway).await;
        assert!(matches!(
            result,
            Err(IngestError::Gateway(GatewayError::Status { status: 500, .. }))
        ));

        assert_eq!(store.operations().len(), 3);
        let first = store.document("rooms", &room_101).unwrap();
        assert_eq!(first.get("occupied_seats"), Some(&json!(2)));
        assert_eq!(first.get("student_in_room"), Some(&json!(["Alice", "Bob"])));
        // Reset went through, the write after it did not
        let second = store.document("rooms", &room_102).unwrap();
        assert_eq!(second.get("occupied_seats"), Some(&json!(0)));
        assert_eq!(second.get("student_in_room"), Some(&json!([])));
    }

    #[tokio::test]
    async fn test_failed_cost_create_is_a_gateway_error() {
        let store = MemoryStore::new();
        let collections = Collections::default();
        let gateway = PersistenceGateway::new(&store, &collections);

        store.fail_on(0);
        let result = ingest_costs(&office_workbook(), &SheetLayout::default(), &gateway).await;
        assert!(matches!(result, Err(IngestError::Gateway(_))));
        assert!(store.documents("management_costs").is_empty());
    }

    #[tokio::test]
    async fn test_missing_sheet_writes_nothing() {
        let store = MemoryStore::new();
        let collections = Collections::default();
        let gateway = PersistenceGateway::new(&store, &collections);

        let mut table = WorkbookTable::new();
        table.insert_sheet("Sheet3", Vec::new());

        let result = ingest_costs(&table, &SheetLayout::default(), &gateway).await;
        assert!(matches!(
            result,
            Err(IngestError::MissingSheet { ref sheet }) if sheet == "Sheet1"
        ));

        let result = ingest_rooms(&table, &SheetLayout::default(), &gateway).await;
        assert!(matches!(result, Err(IngestError::MissingSheet { .. })));
        assert!(store.operations().is_empty());
    }

    #[tokio::test]
    async fn test_empty_cost_sheet_still_stores_a_summary() {
        let store = MemoryStore::new();
        let collections = Collections::default();
        let gateway = PersistenceGateway::new(&store, &collections);

        let mut table = WorkbookTable::new();
        table.insert_sheet("Sheet1", Vec::new());
        table.insert_sheet("Sheet3", Vec::new());

        let report = ingest_costs(&table, &SheetLayout::default(), &gateway)
            .await
            .unwrap();
        assert_eq!(report.summary.accounted_month, costs::UNKNOWN_MONTH);
        assert_eq!(store.documents("management_costs").len(), 1);
    }
}
