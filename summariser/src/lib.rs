use std::path::{Path, PathBuf};

pub mod aggregator;
pub mod frame;
pub mod summary;
pub mod table;
pub mod visualize;

pub use aggregator::{aggregate, aggregate_table, write_table, TABLE_FILE};
pub use table::{AggregateRow, AggregateTable, TableError, LEVEL_COLUMN};

/// How to summarise a sweep root
#[derive(Debug, Clone, Default)]
pub struct SummariseOptions {
    /// Skip rendering charts
    pub no_charts: bool,
    /// Where charts go, `<sweep_root>/charts` if not set
    pub charts_dir: Option<PathBuf>,
}

/// What summarising a sweep produced
#[derive(Debug)]
pub struct SummaryOutput {
    pub table: AggregateTable,
    pub table_path: PathBuf,
    pub charts: Vec<PathBuf>,
}

/// Aggregate the runs under `sweep_root`, write the table, print it and render the charts.
///
/// Failing to write the table is an error. Chart rendering is best effort and only logged.
pub fn summarise(sweep_root: &Path, options: &SummariseOptions) -> anyhow::Result<SummaryOutput> {
    let table = aggregate_table(sweep_root)?;
    let table_path = write_table(&table, sweep_root)?;

    summary::print_summary(&table);

    let mut charts = Vec::new();
    if !options.no_charts {
        let charts_dir = options
            .charts_dir
            .clone()
            .unwrap_or_else(|| sweep_root.join(visualize::CHARTS_DIR));
        match visualize::render(&table, &charts_dir) {
            Ok(written) => charts = written,
            Err(e) => log::warn!("Failed to render charts: {e:?}"),
        }
    }

    Ok(SummaryOutput {
        table,
        table_path,
        charts,
    })
}
