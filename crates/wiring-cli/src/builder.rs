//! The `build` pipeline
//!
//! working directory -> plan discovery -> crop table -> crop every tab
//! (parallel) -> riffle -> room data pages (parallel) -> zone check -> plan
//! page check -> assemble -> write. Intermediates land in the working
//! directory. The output file is only written once both checks have passed.

use crate::checks::{self, gate};
use crate::config::Config;
use crate::discovery::discover_plan_pdfs;
use crate::prompt::Confirm;
use crate::workdir::WorkingDirectory;
use anyhow::{Context, Result};
use lopdf::Document;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use wiring_data::{
    DataPageOptions, current_timestamp, load_room_data, load_zone_locations, render_room_pdf,
};
use wiring_plans::{
    AssemblyReport, CropPositionTable, InterleavedDocument, TabDocument, TabList, assemble,
    crop_tab, load_pdf, parse_pdf, riffle, save_pdf,
};

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub output: PathBuf,
    pub retain_working_directory: bool,
    /// Footer timestamp. The current local time when unset.
    pub timestamp: Option<String>,
}

#[derive(Debug)]
pub struct BuildSummary {
    pub output: PathBuf,
    pub report: AssemblyReport,
}

pub async fn build(
    config: &Config,
    options: &BuildOptions,
    confirm: &mut dyn Confirm,
) -> Result<BuildSummary> {
    println!("Starting documentation pack build...");

    let workdir = WorkingDirectory::create(config.output.working_directory.as_deref())
        .await
        .context("Cannot create working directory")?;

    let result = run(config, options, confirm, &workdir).await;

    workdir.finish(
        options.retain_working_directory,
        config.output.cleanup_temp_files,
    );
    result
}

async fn run(
    config: &Config,
    options: &BuildOptions,
    confirm: &mut dyn Confirm,
    workdir: &WorkingDirectory,
) -> Result<BuildSummary> {
    log::info!("1. Finding plan PDFs...");
    let tabs = TabList::load(&config.tabs_file)
        .await
        .with_context(|| format!("Cannot read tabs file {}", config.tabs_file.display()))?;
    let plans = discover_plan_pdfs(
        &config.plan_pdfs_directory,
        &config.pdf_filename_pattern,
        &tabs,
    )?;

    let table = CropPositionTable::load(&config.crops_file)
        .await
        .with_context(|| format!("Cannot read crops file {}", config.crops_file.display()))?;
    let table = Arc::new(table);

    log::info!("2. Creating cropped plan pages...");
    let cropped = crop_all(plans, &table, workdir).await?;

    log::info!("3. Combining plan pages...");
    let interleaved = tokio::task::spawn_blocking(move || riffle(&cropped))
        .await?
        .context("Error shuffling plans")?;
    save_pdf(
        interleaved.document().clone(),
        workdir.path().join("shuffled_plans.pdf"),
    )
    .await?;
    log::info!(
        "Created shuffled plans: {} pages, {} per room",
        interleaved.page_count(),
        interleaved.tab_count()
    );

    log::info!("4. Creating room data pages...");
    let timestamp = options.timestamp.clone().unwrap_or_else(current_timestamp);
    let room_data = render_room_data(config, &tabs, &timestamp, workdir).await?;

    log::info!("5. Checking for missing zone data...");
    let zones_with_data = load_zone_locations(
        config.csv_data_directory.clone(),
        tabs.as_slice().to_vec(),
    )
    .await?;
    gate(
        confirm,
        &checks::missing_zone_warnings(&config.rooms, &zones_with_data),
    )?;

    log::info!("6. Checking for missing plan pages...");
    let mut warnings = checks::missing_plan_warnings(&config.rooms, &table);
    warnings.extend(checks::duplicate_warnings(&table));
    gate(confirm, &warnings)?;

    log::info!("7. Combining final output...");
    let report = write_output(config, room_data, interleaved, table, &options.output).await?;

    Ok(BuildSummary {
        output: options.output.clone(),
        report,
    })
}

/// Await every task and return the outputs in spawn order. The first
/// failure aborts the tasks still running and waits for them to stop.
async fn join_in_order<T: 'static>(mut tasks: JoinSet<(usize, Result<T>)>) -> Result<Vec<T>> {
    let mut outputs: Vec<Option<T>> = (0..tasks.len()).map(|_| None).collect();

    while let Some(joined) = tasks.join_next().await {
        let outcome = match joined {
            Ok((index, result)) => result.map(|output| (index, output)),
            Err(e) => Err(e.into()),
        };
        match outcome {
            Ok((index, output)) => outputs[index] = Some(output),
            Err(e) => {
                tasks.shutdown().await;
                return Err(e);
            }
        }
    }

    Ok(outputs.into_iter().flatten().collect())
}

/// Crop every tab on its own task. Joining them all is the barrier before
/// riffling. Intermediates are written only once every tab has cropped.
async fn crop_all(
    plans: Vec<(String, PathBuf)>,
    table: &Arc<CropPositionTable>,
    workdir: &WorkingDirectory,
) -> Result<Vec<TabDocument>> {
    let mut tasks = JoinSet::new();
    for (index, (tab, path)) in plans.into_iter().enumerate() {
        let table = Arc::clone(table);
        tasks.spawn(async move {
            let result: wiring_plans::Result<TabDocument> = async {
                let source = load_pdf(&path).await?;
                crop_tab(source, tab.clone(), table).await
            }
            .await;
            let result = result
                .with_context(|| format!("Error cropping PDF for '{}'", tab))
                .map(|tab_doc| (tab, tab_doc));
            (index, result)
        });
    }

    let mut cropped = Vec::new();
    for (tab, tab_doc) in join_in_order(tasks).await? {
        let path = workdir.file("cropped", &tab);
        save_pdf(tab_doc.document().clone(), &path).await?;
        log::info!(
            "Created cropped plans for '{}': {} pages",
            tab,
            tab_doc.page_count()
        );
        cropped.push(tab_doc);
    }

    Ok(cropped)
}

/// Render each configured room's data pages, one task per room
async fn render_room_data(
    config: &Config,
    tabs: &TabList,
    timestamp: &str,
    workdir: &WorkingDirectory,
) -> Result<HashMap<String, Document>> {
    let mut seen = HashSet::new();
    let mut tasks = JoinSet::new();
    for room in &config.rooms {
        if !seen.insert(room.name.as_str()) {
            continue;
        }
        let index = seen.len() - 1;
        let dir = config.csv_data_directory.clone();
        let name = room.name.clone();
        let tabs = tabs.as_slice().to_vec();
        let zones = room.zones.clone();
        let timestamp = timestamp.to_string();

        tasks.spawn(async move {
            let result: wiring_data::Result<Vec<u8>> = async {
                let data = load_room_data(dir, name.clone(), tabs, zones).await?;
                for notice in data.notices() {
                    log::warn!("{}: {}", name, notice);
                }
                log::debug!("{}: {} data rows", name, data.row_count());
                let options = DataPageOptions::default();
                tokio::task::spawn_blocking(move || render_room_pdf(&data, &options, &timestamp))
                    .await?
            }
            .await;
            let result = result
                .with_context(|| format!("Error creating data page for '{}'", name))
                .map(|bytes| (name, bytes));
            (index, result)
        });
    }

    let mut room_data = HashMap::new();
    for (name, bytes) in join_in_order(tasks).await? {
        tokio::fs::write(workdir.file("data", &name), &bytes).await?;
        let doc = parse_pdf(bytes).await?;
        log::info!(
            "Created data page for '{}': {} page(s)",
            name,
            doc.get_pages().len()
        );
        room_data.insert(name, doc);
    }
    Ok(room_data)
}

async fn write_output(
    config: &Config,
    room_data: HashMap<String, Document>,
    interleaved: InterleavedDocument,
    table: Arc<CropPositionTable>,
    output: &Path,
) -> Result<AssemblyReport> {
    let rooms = config.rooms.clone();
    let assembly = tokio::task::spawn_blocking(move || {
        assemble(&rooms, &room_data, &interleaved, &table)
    })
    .await??;

    save_pdf(assembly.document, output)
        .await
        .with_context(|| format!("Cannot write {}", output.display()))?;

    Ok(assembly.report)
}

pub fn print_summary(summary: &BuildSummary) {
    for outcome in &summary.report.rooms {
        match outcome.slot {
            Some(slot) => println!(
                "Added {} data page(s) and {} plan page(s) for '{}' (crop position {})",
                outcome.data_pages, outcome.plan_pages, outcome.room, slot
            ),
            None => println!(
                "Added {} data page(s) for '{}' (not in crops file)",
                outcome.data_pages, outcome.room
            ),
        }
    }
    for outcome in summary.report.truncated_rooms() {
        println!(
            "Warning: plan pages for '{}' ran past the end of the shuffled plans",
            outcome.room
        );
    }
    let unplanned = summary.report.rooms_without_plans().count();
    if unplanned > 0 {
        println!("{} room(s) have data pages only", unplanned);
    }
    println!(
        "\n✓ Documentation pack successfully created: {} ({} pages)",
        summary.output.display(),
        summary.report.total_pages()
    );
}
