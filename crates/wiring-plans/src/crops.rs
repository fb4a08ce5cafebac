//! Crop position table
//!
//! A header-less CSV with one row per room:
//!
//! ```text
//! room name, source page (1-based), x1, y1, x2, y2
//! ```
//!
//! The record position is the room's slot. Slots are positional, so a row that
//! fails to parse still occupies its slot and is reported when the table is
//! used for cropping. A blank line between rows is such a row. Blank lines
//! after the last row are ignored.

use crate::names::normalize_name;
use crate::types::*;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

const FIELDS_PER_ROW: usize = 6;

/// One row of the crop table, well-formed or not
#[derive(Debug, Clone, PartialEq)]
enum CropRow {
    Record(CropRecord),
    Malformed(MalformedRow),
}

impl CropRow {
    fn room_name(&self) -> &str {
        match self {
            CropRow::Record(record) => &record.room_name,
            CropRow::Malformed(row) => &row.room_name,
        }
    }
}

/// Ordered crop rows with name lookup
#[derive(Debug, Clone, Default)]
pub struct CropPositionTable {
    rows: Vec<CropRow>,
    /// Normalised room name per row, same order as `rows`
    normalized: Vec<String>,
}

impl CropPositionTable {
    /// Load the table from a CSV file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_owned();
        let contents = tokio::fs::read(&path).await?;
        tokio::task::spawn_blocking(move || Self::from_reader(contents.as_slice())).await?
    }

    /// Parse the table from any CSV source
    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;

        let records = split_records(&text);
        let used = records
            .iter()
            .rposition(|record| !record.trim().is_empty())
            .map_or(0, |last| last + 1);

        let mut rows = Vec::with_capacity(used);
        for (slot_index, record) in records[..used].iter().enumerate() {
            let row = if record.trim().is_empty() {
                CropRow::Malformed(MalformedRow {
                    slot_index,
                    room_name: String::new(),
                    reason: "blank row".to_string(),
                })
            } else {
                parse_record(slot_index, record)?
            };
            rows.push(row);
        }

        Ok(Self::from_rows(rows))
    }

    fn from_rows(rows: Vec<CropRow>) -> Self {
        let normalized = rows
            .iter()
            .map(|row| normalize_name(row.room_name()))
            .collect();
        Self { rows, normalized }
    }

    /// Number of rows, which is also the number of slots
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows as records, failing with every malformed row if any exist
    pub fn records(&self) -> Result<Vec<&CropRecord>> {
        let mut records = Vec::with_capacity(self.rows.len());
        let mut malformed = Vec::new();

        for row in &self.rows {
            match row {
                CropRow::Record(record) => records.push(record),
                CropRow::Malformed(row) => malformed.push(row.clone()),
            }
        }

        if malformed.is_empty() {
            Ok(records)
        } else {
            Err(PlanError::MalformedRows(malformed))
        }
    }

    /// Slot of the first row whose normalised name matches `room_name`
    pub fn lookup(&self, room_name: &str) -> Result<usize> {
        let wanted = normalize_name(room_name);
        self.normalized
            .iter()
            .position(|name| *name == wanted)
            .ok_or_else(|| PlanError::RoomNotFound {
                room: room_name.to_string(),
            })
    }

    /// Normalised names of every row
    pub fn room_names(&self) -> impl Iterator<Item = &str> {
        self.normalized.iter().map(String::as_str)
    }

    /// Normalised names that occur on more than one row, with their slots.
    /// Blank rows are not counted.
    pub fn duplicate_names(&self) -> Vec<(String, Vec<usize>)> {
        let mut slots_by_name: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (slot, name) in self.normalized.iter().enumerate() {
            if name.is_empty() {
                continue;
            }
            slots_by_name.entry(name.as_str()).or_default().push(slot);
        }

        slots_by_name
            .into_iter()
            .filter(|(_, slots)| slots.len() > 1)
            .map(|(name, slots)| (name.to_string(), slots))
            .collect()
    }
}

// =============================================================================
// Row Parsing
// =============================================================================

/// Split CSV text into one string per record. Line breaks inside quoted
/// fields stay with their record.
fn split_records(text: &str) -> Vec<&str> {
    let mut records = Vec::new();
    let mut start = 0;
    let mut quoted = false;

    for (i, ch) in text.char_indices() {
        match ch {
            '"' => quoted = !quoted,
            '\n' if !quoted => {
                records.push(text[start..i].trim_end_matches('\r'));
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < text.len() {
        records.push(text[start..].trim_end_matches('\r'));
    }

    records
}

fn parse_record(slot_index: usize, text: &str) -> Result<CropRow> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let record = reader.records().next().transpose()?.unwrap_or_default();
    Ok(parse_row(slot_index, &record))
}

fn parse_row(slot_index: usize, record: &csv::StringRecord) -> CropRow {
    let room_name = record.get(0).unwrap_or_default().to_string();

    match parse_fields(record) {
        Ok((source_page, rect)) => CropRow::Record(CropRecord {
            room_name,
            source_page,
            rect,
            slot_index,
        }),
        Err(reason) => CropRow::Malformed(MalformedRow {
            slot_index,
            room_name,
            reason,
        }),
    }
}

fn parse_fields(record: &csv::StringRecord) -> std::result::Result<(u32, CropRect), String> {
    if record.len() != FIELDS_PER_ROW {
        return Err(format!(
            "expected {} fields, found {}",
            FIELDS_PER_ROW,
            record.len()
        ));
    }

    let page_text = record[1].trim();
    let source_page: u32 = page_text
        .parse()
        .map_err(|_| format!("page number '{}' is not a whole number", page_text))?;
    if source_page == 0 {
        return Err("page numbers start at 1".to_string());
    }

    let mut coords = [0.0f32; 4];
    for (i, coord) in coords.iter_mut().enumerate() {
        let text = record[i + 2].trim();
        *coord = text
            .parse()
            .map_err(|_| format!("coordinate '{}' is not a number", text))?;
    }

    let rect = CropRect::new(coords[0], coords[1], coords[2], coords[3]);
    if !rect.is_valid() {
        return Err(format!(
            "rectangle ({}, {}, {}, {}) has no area",
            rect.x1, rect.y1, rect.x2, rect.y2
        ));
    }

    Ok((source_page, rect))
}
