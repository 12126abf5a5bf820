//! Room occupancy from the room sheet
//!
//! The sheet lists a room number on the first row of each block followed by
//! one student name per row:
//!
//! | Room No | ... | Student Name |
//! |---------|-----|--------------|
//! | 101     |     | Alice        |
//! |         |     | Bob          |
//! | 102     |     | Carol        |

use serde::Serialize;

use super::gateway::PersistenceGateway;
use super::layout::RoomSheetLayout;
use crate::api::GatewayError;
use crate::workbook::RowRecord;

/// Occupancy of one room as listed in the sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomOccupancy {
    pub room_number: String,
    pub student_names: Vec<String>,
}

impl RoomOccupancy {
    pub fn new(room_number: impl Into<String>, student_names: Vec<String>) -> Self {
        Self {
            room_number: room_number.into(),
            student_names,
        }
    }

    /// Always the number of listed students
    pub fn occupied_seats(&self) -> usize {
        self.student_names.len()
    }
}

/// Fold room sheet rows into one record per room block, in sheet order.
///
/// Names listed before the first room number belong to no room and are
/// dropped. A room block that appears twice yields two records.
pub fn aggregate_rooms(rows: &[RowRecord], layout: &RoomSheetLayout) -> Vec<RoomOccupancy> {
    let mut rooms = Vec::new();
    let mut current_room: Option<String> = None;
    let mut current_students: Vec<String> = Vec::new();

    for row in rows {
        let room_number = row.text(&layout.room_column);

        if let Some(number) = &room_number {
            match &current_room {
                Some(current) if current != number => {
                    rooms.push(RoomOccupancy::new(
                        current.clone(),
                        std::mem::take(&mut current_students),
                    ));
                    current_room = Some(number.clone());
                }
                Some(_) => {}
                None => current_room = Some(number.clone()),
            }
        }

        if let Some(student) = row.text(&layout.student_column) {
            if current_room.is_some() {
                current_students.push(student);
            } else {
                log::debug!("Row {}: student '{}' listed before any room", row.line, student);
            }
        }
    }

    if let Some(room) = current_room {
        rooms.push(RoomOccupancy::new(room, current_students));
    }

    rooms
}

/// Outcome of writing room occupancy to the store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomRunReport {
    /// Rooms whose document was reset and rewritten
    pub updated: Vec<RoomOccupancy>,
    /// Room numbers with no matching document
    pub missing: Vec<String>,
}

/// Write each room's occupancy, one room at a time in sheet order.
///
/// Each existing room document is first reset to zero occupancy and then
/// rewritten. The two writes are not atomic; a concurrent run touching the
/// same room can interleave between them.
pub async fn apply_room_occupancy(
    gateway: &PersistenceGateway<'_>,
    rooms: &[RoomOccupancy],
) -> Result<RoomRunReport, GatewayError> {
    let mut report = RoomRunReport::default();

    for room in rooms {
        let Some(document_id) = gateway.find_room_document_id(&room.room_number).await? else {
            log::warn!("Room {} does not exist in the database", room.room_number);
            report.missing.push(room.room_number.clone());
            continue;
        };

        gateway.reset_room_occupancy(&document_id).await?;
        gateway
            .write_room_occupancy(&document_id, room.occupied_seats(), &room.student_names)
            .await?;

        log::info!(
            "Room {}: {} occupied seats",
            room.room_number,
            room.occupied_seats()
        );
        report.updated.push(room.clone());
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::MemoryStore;
    use crate::api::Operation;
    use crate::config::Collections;
    use crate::workbook::CellValue;
    use serde_json::json;

    fn row(line: usize, room: Option<CellValue>, name: Option<&str>) -> RowRecord {
        let mut record = RowRecord::new(line);
        if let Some(room) = room {
            record.insert("__EMPTY", room);
        }
        if let Some(name) = name {
            record.insert("__EMPTY_2", CellValue::Text(name.to_string()));
        }
        record
    }

    fn text(s: &str) -> Option<CellValue> {
        Some(CellValue::Text(s.to_string()))
    }

    #[test]
    fn test_aggregate_rooms_example() {
        let rows = vec![
            row(2, text("101"), Some("Alice")),
            row(3, text("101"), Some("Bob")),
            row(4, text("102"), Some("Carol")),
        ];

        let rooms = aggregate_rooms(&rows, &RoomSheetLayout::default());
        assert_eq!(
            rooms,
            vec![
                RoomOccupancy::new("101", vec!["Alice".to_string(), "Bob".to_string()]),
                RoomOccupancy::new("102", vec!["Carol".to_string()]),
            ]
        );
        assert_eq!(rooms[0].occupied_seats(), 2);
        assert_eq!(rooms[1].occupied_seats(), 1);
    }

    #[test]
    fn test_block_layout_with_blank_room_cells() {
        let rows = vec![
            row(2, Some(CellValue::Number(101.0)), Some("Alice")),
            row(3, None, Some("Bob")),
            row(4, Some(CellValue::Number(102.0)), None),
            row(5, Some(CellValue::Number(103.0)), Some("Dan")),
        ];

        let rooms = aggregate_rooms(&rows, &RoomSheetLayout::default());
        assert_eq!(rooms.len(), 3);
        assert_eq!(rooms[0].room_number, "101");
        assert_eq!(rooms[0].student_names, vec!["Alice", "Bob"]);
        // A room with no student rows still counts, with zero seats
        assert_eq!(rooms[1], RoomOccupancy::new("102", vec![]));
        assert_eq!(rooms[2].student_names, vec!["Dan"]);

        for room in &rooms {
            assert_eq!(room.occupied_seats(), room.student_names.len());
        }
    }

    #[test]
    fn test_students_before_first_room_are_dropped() {
        let rows = vec![
            row(2, None, Some("Stray")),
            row(3, text("201"), Some("Eve")),
        ];

        let rooms = aggregate_rooms(&rows, &RoomSheetLayout::default());
        assert_eq!(rooms, vec![RoomOccupancy::new("201", vec!["Eve".to_string()])]);
    }

    #[test]
    fn test_repeated_room_block_is_a_second_record() {
        let rows = vec![
            row(2, text("101"), Some("Alice")),
            row(3, text("102"), Some("Bob")),
            row(4, text("101"), Some("Carol")),
        ];

        let rooms = aggregate_rooms(&rows, &RoomSheetLayout::default());
        let numbers: Vec<&str> = rooms.iter().map(|r| r.room_number.as_str()).collect();
        assert_eq!(numbers, vec!["101", "102", "101"]);
        assert_eq!(rooms[2].student_names, vec!["Carol"]);
    }

    #[test]
    fn test_empty_sheet_has_no_rooms() {
        assert!(aggregate_rooms(&[], &RoomSheetLayout::default()).is_empty());
        let names_only = vec![row(2, None, Some("Alice"))];
        assert!(aggregate_rooms(&names_only, &RoomSheetLayout::default()).is_empty());
    }

    #[tokio::test]
    async fn test_apply_resets_then_writes_and_skips_unknown_rooms() {
        let store = MemoryStore::new();
        let room_101 = store.seed(
            "rooms",
            json!({"room_number": "101", "total_seats": 4, "occupied_seats": 3, "student_in_room": ["Old"]}),
        );
        let collections = Collections::default();
        let gateway = PersistenceGateway::new(&store, &collections);

        let rooms = vec![
            RoomOccupancy::new("101", vec!["Alice".to_string(), "Bob".to_string()]),
            RoomOccupancy::new("999", vec!["Ghost".to_string()]),
        ];

        let report = apply_room_occupancy(&gateway, &rooms).await.unwrap();
        assert_eq!(report.updated.len(), 1);
        assert_eq!(report.missing, vec!["999".to_string()]);

        assert_eq!(
            store.operations(),
            vec![
                Operation::update(
                    "rooms",
                    &room_101,
                    json!({"occupied_seats": 0, "student_in_room": []})
                ),
                Operation::update(
                    "rooms",
                    &room_101,
                    json!({"occupied_seats": 2, "student_in_room": ["Alice", "Bob"]})
                ),
            ]
        );

        let document = store.document("rooms", &room_101).unwrap();
        assert_eq!(document.get("occupied_seats"), Some(&json!(2)));
        assert_eq!(document.get("total_seats"), Some(&json!(4)));
    }

    #[tokio::test]
    async fn test_rerun_repeats_reset_and_write() {
        let store = MemoryStore::new();
        store.seed("rooms", json!({"room_number": "101"}));
        let collections = Collections::default();
        let gateway = PersistenceGateway::new(&store, &collections);
        let rooms = vec![RoomOccupancy::new("101", vec!["Alice".to_string()])];

        let first = apply_room_occupancy(&gateway, &rooms).await.unwrap();
        let second = apply_room_occupancy(&gateway, &rooms).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.operations().len(), 4);
    }
}
