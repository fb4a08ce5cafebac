use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Room '{room}' not found in crop table")]
    RoomNotFound { room: String },
    #[error("Crop table has malformed rows:{}", list_lines(.0))]
    MalformedRows(Vec<MalformedRow>),
    #[error("Tab '{tab}' references pages outside its plan document:{}", list_lines(.problems))]
    PageOutOfRange {
        tab: String,
        problems: Vec<PageRangeProblem>,
    },
    #[error("Tab documents have different numbers of pages:{}", list_lines(.counts))]
    PageCountMismatch { counts: Vec<TabPageCount> },
    #[error("Page index {index} out of range for a document with {page_count} pages")]
    MissingPage { index: usize, page_count: usize },
    #[error("No tab documents to interleave")]
    NoTabs,
}

pub type Result<T> = std::result::Result<T, PlanError>;

fn list_lines<T: fmt::Display>(items: &[T]) -> String {
    items.iter().map(|item| format!("\n  {}", item)).collect()
}

/// Crop rectangle in source-page coordinates.
///
/// The origin is the top-left corner of the source MediaBox with y growing
/// downwards, which is how plan coordinates are measured off a rendered sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CropRect {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }
}

/// One well-formed row of the crop position table
#[derive(Debug, Clone, PartialEq)]
pub struct CropRecord {
    pub room_name: String,
    /// 1-based page number in the tab's plan document
    pub source_page: u32,
    pub rect: CropRect,
    /// 0-based row position in the table
    pub slot_index: usize,
}

/// A crop table row that could not be parsed. It still owns its slot.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedRow {
    pub slot_index: usize,
    pub room_name: String,
    pub reason: String,
}

impl fmt::Display for MalformedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {} ('{}'): {}",
            self.slot_index + 1,
            self.room_name,
            self.reason
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageRangeProblem {
    pub room_name: String,
    pub slot_index: usize,
    pub source_page: u32,
    pub page_count: usize,
}

impl fmt::Display for PageRangeProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {} ('{}'): page {} of {}",
            self.slot_index + 1,
            self.room_name,
            self.source_page,
            self.page_count
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabPageCount {
    pub tab: String,
    pub pages: usize,
}

impl fmt::Display for TabPageCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} pages", self.tab, self.pages)
    }
}

/// A room in the documentation pack
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Room {
    pub name: String,
    /// Zones in configured order, without repeats
    #[cfg_attr(feature = "serde", serde(deserialize_with = "zones::deserialize"))]
    pub zones: Vec<String>,
}

impl Room {
    pub fn new(name: impl Into<String>, zones: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut unique: Vec<String> = Vec::new();
        for zone in zones {
            let zone = zone.into();
            if !unique.contains(&zone) {
                unique.push(zone);
            }
        }
        Self {
            name: name.into(),
            zones: unique,
        }
    }
}

#[cfg(feature = "serde")]
mod zones {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Vec::<String>::deserialize(deserializer)?;
        let mut unique: Vec<String> = Vec::with_capacity(raw.len());
        for zone in raw {
            if !unique.contains(&zone) {
                unique.push(zone);
            }
        }
        Ok(unique)
    }
}
