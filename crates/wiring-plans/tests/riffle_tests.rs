mod common;

use common::*;
use wiring_plans::*;

fn tab(name: &str, pages: usize) -> TabDocument {
    let labels: Vec<String> = (0..pages).map(|slot| format!("{}{}", name, slot)).collect();
    let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
    TabDocument::new(name, create_marked_pdf(&labels))
}

#[test]
fn test_riffle_two_tabs() {
    let interleaved = riffle(&[tab("A", 2), tab("B", 2)]).unwrap();

    assert_eq!(interleaved.tab_count(), 2);
    assert_eq!(interleaved.page_count(), 4);
    assert_eq!(
        page_labels(interleaved.document()),
        vec!["A0", "B0", "A1", "B1"]
    );
}

#[test]
fn test_riffle_inverse_property() {
    let names = ["E", "M", "P", "S"];
    let slots = 5;
    let tabs: Vec<TabDocument> = names.iter().map(|name| tab(name, slots)).collect();

    let interleaved = riffle(&tabs).unwrap();
    let labels = page_labels(interleaved.document());
    let layout = interleaved.layout();

    assert_eq!(labels.len(), names.len() * slots);
    for slot in 0..slots {
        for (tab_index, name) in names.iter().enumerate() {
            assert_eq!(
                labels[slot * names.len() + tab_index],
                format!("{}{}", name, slot)
            );
            assert_eq!(layout.page_index(slot, tab_index), slot * names.len() + tab_index);
        }
    }
}

#[test]
fn test_room_block_is_contiguous() {
    let names = ["E", "M", "P"];
    let tabs: Vec<TabDocument> = names.iter().map(|name| tab(name, 4)).collect();
    let interleaved = riffle(&tabs).unwrap();
    let labels = page_labels(interleaved.document());

    let block: Vec<&str> = interleaved
        .slot_pages(2)
        .map(|index| labels[index].as_str())
        .collect();
    assert_eq!(block, vec!["E2", "M2", "P2"]);
}

#[test]
fn test_page_count_mismatch_lists_every_document() {
    let result = riffle(&[tab("A", 3), tab("B", 3), tab("C", 2)]);

    match result {
        Err(PlanError::PageCountMismatch { counts }) => {
            assert_eq!(counts.len(), 3);
            assert_eq!(
                counts[2],
                TabPageCount {
                    tab: "C".to_string(),
                    pages: 2
                }
            );
            let message = PlanError::PageCountMismatch { counts }.to_string();
            assert!(message.contains("C: 2 pages"));
            assert!(message.contains("A: 3 pages"));
        }
        other => panic!("Expected PageCountMismatch error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_riffle_no_tabs() {
    assert!(matches!(riffle(&[]), Err(PlanError::NoTabs)));
}

#[test]
fn test_single_tab_keeps_order() {
    let interleaved = riffle(&[tab("A", 3)]).unwrap();
    assert_eq!(
        page_labels(interleaved.document()),
        vec!["A0", "A1", "A2"]
    );
}

#[test]
fn test_shared_resources_copied_once() {
    use lopdf::{Dictionary, Object};

    let mut doc = create_marked_pdf(&["A0", "A1"]);
    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));
    for page_id in doc.get_pages().into_values().collect::<Vec<_>>() {
        let fonts = Dictionary::from_iter(vec![("F1", Object::Reference(font_id))]);
        let resources = Dictionary::from_iter(vec![("Font", Object::Dictionary(fonts))]);
        doc.get_dictionary_mut(page_id)
            .unwrap()
            .set("Resources", Object::Dictionary(resources));
    }

    let interleaved = riffle(&[TabDocument::new("A", doc)]).unwrap();
    let out = interleaved.document();

    let font_refs: Vec<_> = out
        .get_pages()
        .into_values()
        .map(|page_id| {
            out.get_dictionary(page_id)
                .unwrap()
                .get(b"Resources")
                .unwrap()
                .as_dict()
                .unwrap()
                .get(b"Font")
                .unwrap()
                .as_dict()
                .unwrap()
                .get(b"F1")
                .unwrap()
                .as_reference()
                .unwrap()
        })
        .collect();
    assert_eq!(font_refs[0], font_refs[1]);
}
