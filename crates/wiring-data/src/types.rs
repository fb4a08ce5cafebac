use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Invalid page options: {0}")]
    InvalidOptions(String),
}

pub type Result<T> = std::result::Result<T, DataError>;

/// Header plus the rows of one tab CSV that belong to a room
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ZoneTable {
    /// Widest row, header included
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0)
    }
}

/// What one tab contributes to a room's data pages
#[derive(Debug, Clone, PartialEq)]
pub enum TabSection {
    Table { tab: String, table: ZoneTable },
    MissingCsv { tab: String },
    AmbiguousCsv { tab: String, files: Vec<String> },
}

impl TabSection {
    pub fn tab(&self) -> &str {
        match self {
            TabSection::Table { tab, .. }
            | TabSection::MissingCsv { tab }
            | TabSection::AmbiguousCsv { tab, .. } => tab,
        }
    }

    /// Text shown in place of a table when the tab's CSV could not be chosen
    pub fn notice(&self) -> Option<String> {
        match self {
            TabSection::Table { .. } => None,
            TabSection::MissingCsv { tab } => Some(format!("No CSV file found for tab {}.", tab)),
            TabSection::AmbiguousCsv { tab, files } => Some(format!(
                "Ambiguous choice of CSV files for tab {}: {}",
                tab,
                files.join(", ")
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoomData {
    pub room_name: String,
    pub sections: Vec<TabSection>,
}

impl RoomData {
    pub fn row_count(&self) -> usize {
        self.sections
            .iter()
            .map(|section| match section {
                TabSection::Table { table, .. } => table.rows.len(),
                _ => 0,
            })
            .sum()
    }

    pub fn notices(&self) -> impl Iterator<Item = String> + '_ {
        self.sections.iter().filter_map(TabSection::notice)
    }
}
