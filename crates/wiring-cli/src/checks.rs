//! Pre-output checks and the confirmation gate
//!
//! Missing zone data, rooms without plan pages and repeated crop rows are not
//! fatal on their own. They are listed and the [`Confirm`] implementation
//! decides whether the build carries on.

use crate::config::Config;
use crate::prompt::Confirm;
use std::collections::BTreeSet;
use thiserror::Error;
use wiring_plans::{CropPositionTable, Room, TabList, normalize_name};

#[derive(Error, Debug)]
#[error("Build cancelled by user")]
pub struct Cancelled;

/// Configured zones with no row in any tab CSV
pub fn missing_zone_warnings(rooms: &[Room], zones_with_data: &BTreeSet<String>) -> Vec<String> {
    let with_data: BTreeSet<String> = zones_with_data.iter().map(|z| normalize_name(z)).collect();
    let configured: BTreeSet<String> = rooms
        .iter()
        .flat_map(|room| &room.zones)
        .map(|zone| normalize_name(zone))
        .collect();

    configured
        .difference(&with_data)
        .map(|zone| format!("No data for zone \"{}\"", zone))
        .collect()
}

/// Configured rooms with no row in the crop table
pub fn missing_plan_warnings(rooms: &[Room], table: &CropPositionTable) -> Vec<String> {
    let cropped: BTreeSet<String> = table.room_names().map(normalize_name).collect();
    let configured: BTreeSet<String> = rooms.iter().map(|room| normalize_name(&room.name)).collect();

    configured
        .difference(&cropped)
        .map(|room| format!("No plan pages for room \"{}\" (not found in crops file)", room))
        .collect()
}

/// Rooms named on more than one crop table row. The first row wins.
pub fn duplicate_warnings(table: &CropPositionTable) -> Vec<String> {
    table
        .duplicate_names()
        .into_iter()
        .map(|(name, slots)| {
            let rows: Vec<String> = slots.iter().map(|slot| (slot + 1).to_string()).collect();
            format!(
                "Room \"{}\" appears on rows {} of the crops file; using row {}",
                name,
                rows.join(", "),
                rows[0]
            )
        })
        .collect()
}

/// List `warnings` and ask whether to proceed. No warnings, no question.
pub fn gate(confirm: &mut dyn Confirm, warnings: &[String]) -> anyhow::Result<()> {
    if warnings.is_empty() {
        return Ok(());
    }

    println!("\nWarnings:");
    for warning in warnings {
        println!("{}", warning);
    }

    if confirm.confirm("Proceed with output?")? {
        Ok(())
    } else {
        Err(Cancelled.into())
    }
}

// ============================================================================
// `check` command
// ============================================================================

/// Validate a configuration without building. Returns the warnings that a
/// build would put in front of the confirmation gate.
pub async fn check_config(config: &Config) -> anyhow::Result<Vec<String>> {
    println!("Checking file paths...");
    for (what, path) in config.input_paths() {
        let mark = if path.exists() { "✓" } else { "✗" };
        println!("  {} {}: {}", mark, what, path.display());
    }
    config.check_paths()?;

    println!("\nChecking rooms configuration...");
    for room in &config.rooms {
        println!("  ✓ Room: {} ({} zones)", room.name, room.zones.len());
    }

    let tabs = TabList::load(&config.tabs_file).await?;
    println!("\nTabs: {}", tabs.as_slice().join(", "));

    let table = CropPositionTable::load(&config.crops_file).await?;
    let records = table.records()?;
    println!("Crops file: {} rooms", records.len());

    let plans = crate::discovery::discover_plan_pdfs(
        &config.plan_pdfs_directory,
        &config.pdf_filename_pattern,
        &tabs,
    )?;
    for (tab, path) in &plans {
        println!("  ✓ Plan for '{}': {}", tab, path.display());
    }

    let mut warnings = duplicate_warnings(&table);
    warnings.extend(missing_plan_warnings(&config.rooms, &table));
    Ok(warnings)
}
