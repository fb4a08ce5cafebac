//! Plan-page pipeline for wiring documentation packs
//!
//! 1. Load the crop position table (one row per room, row = slot)
//! 2. Crop every tab's plan document into one page per slot
//! 3. Riffle the tab documents so each room's pages are contiguous
//! 4. Assemble rooms in configured order: data pages, then plan block

pub mod assemble;
pub mod constants;
pub mod crop;
pub mod crops;
mod io;
mod layout;
mod names;
pub mod render;
pub mod riffle;
mod tabs;
mod types;

pub use assemble::{Assembly, AssemblyReport, RoomOutcome, assemble};
pub use crop::{TabDocument, crop_document, crop_tab};
pub use crops::CropPositionTable;
pub use io::{load_pdf, parse_pdf, save_pdf};
pub use layout::PlanLayout;
pub use names::normalize_name;
pub use riffle::{InterleavedDocument, riffle};
pub use tabs::TabList;
pub use types::*;
