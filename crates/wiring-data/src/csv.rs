use crate::types::{Result, RoomData, TabSection, ZoneTable};
use std::collections::BTreeSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use wiring_plans::normalize_name;

/// Outcome of looking for a tab's CSV in the data directory
#[derive(Debug, Clone, PartialEq)]
pub enum CsvMatch {
    Unique(PathBuf),
    Missing,
    Ambiguous(Vec<String>),
}

/// Find the file in `dir` whose name starts with `tab` and ends with `.csv`
pub fn find_tab_csv(dir: &Path, tab: &str) -> Result<CsvMatch> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(tab) && name.ends_with(".csv") {
            names.push(name);
        }
    }
    names.sort();

    Ok(match names.len() {
        0 => CsvMatch::Missing,
        1 => CsvMatch::Unique(dir.join(&names[0])),
        _ => CsvMatch::Ambiguous(names),
    })
}

fn reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(source)
}

fn field<'a>(record: &'a csv::StringRecord, index: usize) -> &'a str {
    record.get(index).unwrap_or("")
}

/// Read a tab CSV keeping the rows whose zone is one of `zones`.
///
/// The zone lives in the second column. A blank zone repeats the zone of the
/// row above, and rows with a blank first column are dropped. Zones are
/// compared after [`normalize_name`].
pub fn read_zone_table<R: Read>(source: R, zones: &[String]) -> Result<ZoneTable> {
    let zones: Vec<String> = zones.iter().map(|zone| normalize_name(zone)).collect();
    let mut records = reader(source).into_records();
    let mut table = ZoneTable::default();

    match records.next() {
        Some(header) => table.header = header?.iter().map(str::to_string).collect(),
        None => return Ok(table),
    }

    let mut row_zone = String::new();
    for record in records {
        let record = record?;
        let zone = normalize_name(field(&record, 1));
        if !zone.is_empty() {
            row_zone = zone;
        }

        let wanted = zones.contains(&row_zone);
        if wanted && !field(&record, 0).trim().is_empty() {
            table.rows.push(record.iter().map(str::to_string).collect());
        }
    }

    Ok(table)
}

/// Gather a room's rows from every tab, in tab order
pub fn extract_room_data(
    dir: &Path,
    room_name: &str,
    tabs: &[String],
    zones: &[String],
) -> Result<RoomData> {
    let mut sections = Vec::with_capacity(tabs.len());

    for tab in tabs {
        let section = match find_tab_csv(dir, tab)? {
            CsvMatch::Unique(path) => {
                let table = read_zone_table(std::fs::File::open(&path)?, zones)?;
                log::debug!(
                    "{}: {} rows for {} from {}",
                    tab,
                    table.rows.len(),
                    room_name,
                    path.display()
                );
                TabSection::Table {
                    tab: tab.clone(),
                    table,
                }
            }
            CsvMatch::Missing => TabSection::MissingCsv { tab: tab.clone() },
            CsvMatch::Ambiguous(files) => TabSection::AmbiguousCsv {
                tab: tab.clone(),
                files,
            },
        };
        sections.push(section);
    }

    Ok(RoomData {
        room_name: room_name.to_string(),
        sections,
    })
}

pub async fn load_room_data(
    dir: PathBuf,
    room_name: String,
    tabs: Vec<String>,
    zones: Vec<String>,
) -> Result<RoomData> {
    tokio::task::spawn_blocking(move || extract_room_data(&dir, &room_name, &tabs, &zones))
        .await?
}

/// Every zone named in the second column of the tab CSVs
pub fn scan_zone_locations(dir: &Path, tabs: &[String]) -> Result<BTreeSet<String>> {
    let mut zones = BTreeSet::new();

    for tab in tabs {
        let path = match find_tab_csv(dir, tab)? {
            CsvMatch::Unique(path) => path,
            _ => continue,
        };

        if let Err(e) = scan_file(&path, &mut zones) {
            log::warn!("Could not read {}: {}", path.display(), e);
        }
    }

    Ok(zones)
}

fn scan_file(path: &Path, zones: &mut BTreeSet<String>) -> Result<()> {
    let file = std::fs::File::open(path)?;
    for record in reader(file).into_records().skip(1) {
        let record = record?;
        let zone = field(&record, 1).trim();
        if !zone.is_empty() {
            zones.insert(zone.to_string());
        }
    }
    Ok(())
}

pub async fn load_zone_locations(dir: PathBuf, tabs: Vec<String>) -> Result<BTreeSet<String>> {
    tokio::task::spawn_blocking(move || scan_zone_locations(&dir, &tabs)).await?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zones(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_blank_zone_inherits_previous() {
        let csv = "Circuit,Zone,Notes\nC1,Kitchen,a\nC2,,b\nC3,Hall,c\nC4,,d\n";
        let table = read_zone_table(csv.as_bytes(), &zones(&["Kitchen"])).unwrap();

        assert_eq!(table.header, vec!["Circuit", "Zone", "Notes"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1], vec!["C2", "", "b"]);
    }

    #[test]
    fn test_blank_first_column_is_dropped() {
        let csv = "Circuit,Zone\n,Kitchen\nC2,\n";
        let table = read_zone_table(csv.as_bytes(), &zones(&["Kitchen"])).unwrap();

        // The blank row still sets the zone for the row after it
        assert_eq!(table.rows, vec![vec!["C2".to_string(), String::new()]]);
    }

    #[test]
    fn test_short_rows_are_tolerated() {
        let csv = "Circuit,Zone\nC1\nC2,Hall\n";
        let table = read_zone_table(csv.as_bytes(), &zones(&["Hall"])).unwrap();
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_empty_file_gives_empty_table() {
        let table = read_zone_table("".as_bytes(), &zones(&["Hall"])).unwrap();
        assert_eq!(table, ZoneTable::default());
    }

    #[test]
    fn test_header_only() {
        let table = read_zone_table("A,B\n".as_bytes(), &zones(&["Hall"])).unwrap();
        assert_eq!(table.header, vec!["A", "B"]);
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_zones_match_after_normalisation() {
        let csv = "Circuit,Zone\nC1,Zone B\nC2,Bob\u{2019}s  den\nC3,Zone C\n";
        let table =
            read_zone_table(csv.as_bytes(), &zones(&["Zone  B", " Bob's den"])).unwrap();

        let circuits: Vec<&str> = table.rows.iter().map(|row| row[0].as_str()).collect();
        assert_eq!(circuits, vec!["C1", "C2"]);
        assert_eq!(table.rows[1][1], "Bob\u{2019}s  den");
    }
}
