use crate::frame::write_csv;
use crate::table::{AggregateTable, TableError};
use anyhow::Context;
use build_sweep_report_model::{level_from_folder_name, parse_report, Level, TIME_REPORT_FILE};
use itertools::Itertools;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Name of the aggregated table written into the sweep root
pub const TABLE_FILE: &str = "data_res.csv";

/// A run folder in a sweep root that has a timing report
#[derive(Debug, Clone, PartialEq)]
pub struct RunFolder {
    pub level: Level,
    pub name: String,
    pub report: PathBuf,
}

/// Find the run folders under `sweep_root` that can be aggregated.
///
/// Only immediate subdirectories holding a timing report count. The level is read from the folder
/// name, so folders can be aggregated without any record of the sweep that made them. Folders are
/// returned in ascending level order.
pub fn find_run_folders(sweep_root: &Path) -> anyhow::Result<Vec<RunFolder>> {
    let entries = std::fs::read_dir(sweep_root)
        .with_context(|| format!("Failed to read sweep root {}", sweep_root.display()))?;

    let mut folders = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let report = path.join(TIME_REPORT_FILE);
        if !report.is_file() {
            log::debug!("No time report in {}, skipping", path.display());
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let Some(level) = level_from_folder_name(&name) else {
            log::warn!("Cannot read a level from folder name '{name}', skipping");
            continue;
        };

        folders.push(RunFolder {
            level,
            name,
            report,
        });
    }

    Ok(folders
        .into_iter()
        .sorted_by(|a, b| a.level.cmp(&b.level).then_with(|| a.name.cmp(&b.name)))
        .collect())
}

/// Build the aggregate table for every run folder in `sweep_root`.
///
/// Each run gets a row, zero-filled for the categories seen so far. Categories first seen in a
/// later run become new columns and are backfilled with 0 for the earlier rows. Reports that can't
/// be read are logged and skipped.
pub fn aggregate_table(sweep_root: &Path) -> anyhow::Result<AggregateTable> {
    let mut table = AggregateTable::new();

    for folder in find_run_folders(sweep_root)? {
        let samples = match File::open(&folder.report)
            .and_then(|file| parse_report(BufReader::new(file)))
        {
            Ok(samples) => samples,
            Err(e) => {
                log::warn!("Failed to read {}: {e}", folder.report.display());
                continue;
            }
        };

        let row = table.push_row(folder.level);
        for sample in &samples {
            match table.record(row, sample) {
                Err(TableError::ReservedColumn(category)) => {
                    log::warn!("Ignoring category '{category}' in {}", folder.report.display());
                }
                result => result?,
            }
        }
        log::debug!(
            "Aggregated {} samples for level {} from {}",
            samples.len(),
            folder.level,
            folder.name
        );
    }

    log::info!(
        "Aggregated {} runs with {} categories from {}",
        table.rows().len(),
        table.columns().len(),
        sweep_root.display()
    );

    Ok(table)
}

/// Aggregate `sweep_root` and write the table to `<sweep_root>/data_res.csv`.
pub fn aggregate(sweep_root: &Path) -> anyhow::Result<PathBuf> {
    let table = aggregate_table(sweep_root)?;
    write_table(&table, sweep_root)
}

/// Write an aggregated table to `<sweep_root>/data_res.csv`, returning the path.
pub fn write_table(table: &AggregateTable, sweep_root: &Path) -> anyhow::Result<PathBuf> {
    let path = sweep_root.join(TABLE_FILE);
    write_csv(table, &path)?;
    log::info!("Sweep data written to {}", path.display());
    Ok(path)
}
