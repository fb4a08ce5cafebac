//! Final document assembly
//!
//! Walks the rooms in configured order and, for each, appends its data pages
//! followed by its block of plan pages from the interleaved document. The
//! block is located purely from the room's crop table slot.

use crate::crops::CropPositionTable;
use crate::render::{PageSource, PageWriter};
use crate::riffle::InterleavedDocument;
use crate::types::*;
use lopdf::Document;
use std::collections::HashMap;

/// What went into the output for one room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomOutcome {
    pub room: String,
    pub data_pages: usize,
    /// Crop table slot, `None` when the room has no crop row
    pub slot: Option<usize>,
    pub plan_pages: usize,
    /// The interleaved document ended before this room's block did
    pub truncated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyReport {
    pub rooms: Vec<RoomOutcome>,
}

impl AssemblyReport {
    pub fn total_pages(&self) -> usize {
        self.rooms
            .iter()
            .map(|room| room.data_pages + room.plan_pages)
            .sum()
    }

    pub fn rooms_without_plans(&self) -> impl Iterator<Item = &RoomOutcome> {
        self.rooms.iter().filter(|room| room.slot.is_none())
    }

    pub fn truncated_rooms(&self) -> impl Iterator<Item = &RoomOutcome> {
        self.rooms.iter().filter(|room| room.truncated)
    }
}

/// The assembled output and a per-room account of it
#[derive(Debug)]
pub struct Assembly {
    pub document: Document,
    pub report: AssemblyReport,
}

/// Assemble the final document.
///
/// # Arguments
/// * `rooms` - Rooms in output order
/// * `room_data` - Data page document per room name; rooms without one get no data pages
/// * `interleaved` - Riffled plan pages; its layout supplies the tab count
/// * `table` - Crop table mapping room names to slots
///
/// A room missing from the crop table gets no plan pages and a warning. A
/// plan block running past the end of the interleaved document is clamped to
/// the pages that exist, with a warning.
pub fn assemble(
    rooms: &[Room],
    room_data: &HashMap<String, Document>,
    interleaved: &InterleavedDocument,
    table: &CropPositionTable,
) -> Result<Assembly> {
    let tab_count = interleaved.tab_count();
    let mut plans = PageSource::new(interleaved.document());
    let mut writer = PageWriter::new();
    let mut report = AssemblyReport::default();

    for room in rooms {
        let data_pages = match room_data.get(&room.name) {
            Some(doc) => writer.append_all(&mut PageSource::new(doc))?,
            None => 0,
        };

        let mut outcome = RoomOutcome {
            room: room.name.clone(),
            data_pages,
            slot: None,
            plan_pages: 0,
            truncated: false,
        };

        match table.lookup(&room.name) {
            Ok(slot) => {
                let pages = interleaved.slot_pages(slot);
                for index in pages.clone() {
                    writer.append_page(&mut plans, index)?;
                }

                outcome.slot = Some(slot);
                outcome.plan_pages = pages.len();
                outcome.truncated = pages.len() < tab_count;

                if outcome.truncated {
                    log::warn!(
                        "Plan pages for '{}' truncated: expected {}, found {} (slot {})",
                        room.name,
                        tab_count,
                        pages.len(),
                        slot
                    );
                }
                log::info!(
                    "Added {} data page(s) and {} plan page(s) for '{}' (crop position {})",
                    data_pages,
                    outcome.plan_pages,
                    room.name,
                    slot
                );
            }
            Err(PlanError::RoomNotFound { .. }) => {
                log::warn!(
                    "Skipped plan pages for '{}' (not in crop table)",
                    room.name
                );
            }
            Err(e) => return Err(e),
        }

        report.rooms.push(outcome);
    }

    Ok(Assembly {
        document: writer.finish(),
        report,
    })
}
