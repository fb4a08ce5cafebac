mod common;

use common::*;
use lopdf::Document;
use std::collections::HashMap;
use wiring_plans::*;

fn table(csv: &str) -> CropPositionTable {
    CropPositionTable::from_reader(csv.as_bytes()).unwrap()
}

fn room(name: &str) -> Room {
    Room::new(name, ["Zone"])
}

fn data(entries: &[(&str, &[&str])]) -> HashMap<String, Document> {
    entries
        .iter()
        .map(|(name, labels)| (name.to_string(), create_marked_pdf(labels)))
        .collect()
}

/// Two tabs A and B, two rooms, each tab's plan having two pages
fn two_tab_plans() -> (CropPositionTable, InterleavedDocument) {
    let table = table(CROPS_CSV);
    let tab_a = crop_document(&create_marked_pdf(&["A0", "A1"]), "A", &table).unwrap();
    let tab_b = crop_document(&create_marked_pdf(&["B0", "B1"]), "B", &table).unwrap();
    let interleaved = riffle(&[tab_a, tab_b]).unwrap();
    (table, interleaved)
}

#[test]
fn test_end_to_end_room_order() {
    let (table, interleaved) = two_tab_plans();
    assert_eq!(
        page_labels(interleaved.document()),
        vec!["A0", "B0", "A1", "B1"]
    );

    let rooms = vec![room("Room2"), room("Room1")];
    let room_data = data(&[
        ("Room1", &["Room1-data"]),
        ("Room2", &["Room2-data-1", "Room2-data-2"]),
    ]);

    let assembly = assemble(&rooms, &room_data, &interleaved, &table).unwrap();

    assert_eq!(
        page_labels(&assembly.document),
        vec![
            "Room2-data-1",
            "Room2-data-2",
            "A1",
            "B1",
            "Room1-data",
            "A0",
            "B0"
        ]
    );
    assert_eq!(assembly.report.total_pages(), 7);
    assert_eq!(assembly.report.rooms[0].slot, Some(1));
    assert_eq!(assembly.report.rooms[1].slot, Some(0));
}

#[test]
fn test_room_missing_from_crop_table_gets_data_only() {
    let (table, interleaved) = two_tab_plans();
    let rooms = vec![room("Room1"), room("Loft")];
    let room_data = data(&[("Room1", &["Room1-data"]), ("Loft", &["Loft-data"])]);

    let assembly = assemble(&rooms, &room_data, &interleaved, &table).unwrap();

    assert_eq!(
        page_labels(&assembly.document),
        vec!["Room1-data", "A0", "B0", "Loft-data"]
    );
    let missing: Vec<&str> = assembly
        .report
        .rooms_without_plans()
        .map(|outcome| outcome.room.as_str())
        .collect();
    assert_eq!(missing, vec!["Loft"]);
}

#[test]
fn test_room_without_data_gets_plans_only() {
    let (table, interleaved) = two_tab_plans();
    let rooms = vec![room("Room1"), room("Room2")];
    let room_data = data(&[("Room2", &[])]);

    let assembly = assemble(&rooms, &room_data, &interleaved, &table).unwrap();

    assert_eq!(
        page_labels(&assembly.document),
        vec!["A0", "B0", "A1", "B1"]
    );
    assert_eq!(assembly.report.rooms[0].data_pages, 0);
    assert_eq!(assembly.report.rooms[1].data_pages, 0);
}

#[test]
fn test_room_name_lookup_is_normalised() {
    let (table, interleaved) = two_tab_plans();
    let rooms = vec![room("  Room2 ")];

    let assembly = assemble(&rooms, &HashMap::new(), &interleaved, &table).unwrap();
    assert_eq!(page_labels(&assembly.document), vec!["A1", "B1"]);
}

#[test]
fn test_short_interleaved_document_is_clamped() {
    // Layout claims 2 tabs x 3 slots but only 5 pages exist
    let doc = create_marked_pdf(&["A0", "B0", "A1", "B1", "A2"]);
    let interleaved = InterleavedDocument::new(doc, PlanLayout::new(2, 3));
    let table = table("R0,1,0,0,1,1\nR1,1,0,0,1,1\nR2,1,0,0,1,1\nR3,1,0,0,1,1\n");
    let rooms = vec![room("R2"), room("R3"), room("R1")];

    let assembly = assemble(&rooms, &HashMap::new(), &interleaved, &table).unwrap();

    assert_eq!(page_labels(&assembly.document), vec!["A2", "A1", "B1"]);

    let outcomes = &assembly.report.rooms;
    assert_eq!((outcomes[0].plan_pages, outcomes[0].truncated), (1, true));
    assert_eq!((outcomes[1].plan_pages, outcomes[1].truncated), (0, true));
    assert_eq!((outcomes[2].plan_pages, outcomes[2].truncated), (2, false));
    assert_eq!(assembly.report.truncated_rooms().count(), 2);
}

#[test]
fn test_duplicate_crop_rows_use_first_slot() {
    let (_, interleaved) = two_tab_plans();
    let table = table("Room1,1,0,0,1,1\nRoom1,1,0,0,1,1\n");
    let rooms = vec![room("Room1")];

    let assembly = assemble(&rooms, &HashMap::new(), &interleaved, &table).unwrap();
    assert_eq!(page_labels(&assembly.document), vec!["A0", "B0"]);
}

#[test]
fn test_same_room_twice_appends_pages_twice() {
    let (table, interleaved) = two_tab_plans();
    let rooms = vec![room("Room1"), room("Room1")];

    let assembly = assemble(&rooms, &HashMap::new(), &interleaved, &table).unwrap();

    assert_eq!(
        page_labels(&assembly.document),
        vec!["A0", "B0", "A0", "B0"]
    );
    let pages = assembly.document.get_pages();
    assert_eq!(pages.len(), 4);
    assert_ne!(pages[&1], pages[&3]);
}

#[tokio::test]
async fn test_assembled_document_round_trips_through_disk() {
    let (table, interleaved) = two_tab_plans();
    let rooms = vec![room("Room2"), room("Room1")];
    let assembly = assemble(&rooms, &HashMap::new(), &interleaved, &table).unwrap();

    let temp = tempfile::NamedTempFile::new().unwrap();
    save_pdf(assembly.document, temp.path()).await.unwrap();

    let loaded = load_pdf(temp.path()).await.unwrap();
    assert_eq!(page_labels(&loaded), vec!["A1", "B1", "A0", "B0"]);
}
