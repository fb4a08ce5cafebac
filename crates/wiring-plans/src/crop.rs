//! Per-tab cropping
//!
//! Turns one tab's plan document into a [`TabDocument`] holding one page per
//! crop table row, in row order, so page `k` is always slot `k`.

use crate::constants::CROP_XOBJECT_NAME;
use crate::crops::CropPositionTable;
use crate::render::{PageWriter, create_cropped_xobject, get_media_box, get_rotation};
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;
use std::sync::Arc;

/// Cropped pages of one tab, one per crop table row
#[derive(Debug, Clone)]
pub struct TabDocument {
    tab: String,
    document: Document,
}

impl TabDocument {
    pub fn new(tab: impl Into<String>, document: Document) -> Self {
        Self {
            tab: tab.into(),
            document,
        }
    }

    pub fn tab(&self) -> &str {
        &self.tab
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }
}

/// Crop a tab's plan document on the blocking pool
pub async fn crop_tab(
    source: Document,
    tab: String,
    table: Arc<CropPositionTable>,
) -> Result<TabDocument> {
    tokio::task::spawn_blocking(move || crop_document(&source, &tab, &table)).await?
}

/// Crop `source` into one page per crop table row.
///
/// The whole table is checked against `source` first; malformed rows or page
/// references past the end of the document fail the tab with every offending
/// row listed.
pub fn crop_document(
    source: &Document,
    tab: &str,
    table: &CropPositionTable,
) -> Result<TabDocument> {
    let records = table.records()?;
    let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();

    let problems: Vec<PageRangeProblem> = records
        .iter()
        .filter(|record| record.source_page as usize > page_ids.len())
        .map(|record| PageRangeProblem {
            room_name: record.room_name.clone(),
            slot_index: record.slot_index,
            source_page: record.source_page,
            page_count: page_ids.len(),
        })
        .collect();
    if !problems.is_empty() {
        return Err(PlanError::PageOutOfRange {
            tab: tab.to_string(),
            problems,
        });
    }

    let mut writer = PageWriter::new();
    let mut cache: HashMap<ObjectId, ObjectId> = HashMap::new();

    for record in records {
        let page_id = page_ids[record.source_page as usize - 1];
        render_cropped_page(&mut writer, source, page_id, record, &mut cache)?;
    }

    log::debug!("Cropped {} page(s) for tab '{}'", writer.page_count(), tab);
    Ok(TabDocument::new(tab, writer.finish()))
}

/// Append one cropped page showing `record.rect` of the source page
fn render_cropped_page(
    writer: &mut PageWriter,
    source: &Document,
    page_id: ObjectId,
    record: &CropRecord,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<()> {
    let media_box = get_media_box(source, page_id);
    let bbox = crop_bbox(media_box, &record.rect);

    let outside = bbox[0] < media_box[0]
        || bbox[1] < media_box[1]
        || bbox[2] > media_box[2]
        || bbox[3] > media_box[3];
    if outside {
        log::warn!(
            "Crop for '{}' extends beyond page {} of its plan",
            record.room_name,
            record.source_page
        );
    }

    let xobject_id = create_cropped_xobject(writer.document_mut(), source, page_id, bbox, cache)?;

    let width = record.rect.width();
    let height = record.rect.height();
    let content = format!(
        "q 0 0 {} {} re W n 1 0 0 1 {} {} cm /{} Do Q\n",
        width, height, -bbox[0], -bbox[1], CROP_XOBJECT_NAME
    );
    let content_id = writer
        .document_mut()
        .add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let mut xobjects = Dictionary::new();
    xobjects.set(CROP_XOBJECT_NAME, Object::Reference(xobject_id));
    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let mut page_dict = Dictionary::new();
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(width),
            Object::Real(height),
        ]),
    );
    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(resources));

    let rotation = get_rotation(source, page_id);
    if rotation != 0 {
        page_dict.set("Rotate", Object::Integer(rotation));
    }

    writer.add_page(page_dict);
    Ok(())
}

/// Convert a top-left-origin crop rectangle into a PDF user-space box
/// `[llx, lly, urx, ury]` on a page with the given MediaBox.
pub fn crop_bbox(media_box: [f32; 4], rect: &CropRect) -> [f32; 4] {
    let [left, _, _, top] = media_box;
    [
        left + rect.x1,
        top - rect.y2,
        left + rect.x2,
        top - rect.y1,
    ]
}
