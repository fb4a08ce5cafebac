//! Per-room wiring data: zone rows pulled from the tab CSVs and rendered as
//! paginated PDF tables.

pub mod csv;
pub mod layout;
pub mod options;
pub mod pdf;
pub mod types;

pub use crate::csv::{
    CsvMatch, extract_room_data, find_tab_csv, load_room_data, load_zone_locations,
    read_zone_table, scan_zone_locations,
};
pub use options::DataPageOptions;
pub use pdf::{TIMESTAMP_FORMAT, current_timestamp, format_timestamp, render_room_pdf};
pub use types::*;
