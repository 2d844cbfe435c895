use crate::table::{AggregateTable, LEVEL_COLUMN};
use anyhow::Context;
use polars::prelude::*;
use std::path::Path;

/// Convert the table to a [DataFrame] with the level column first, then each metric column in
/// discovery order.
pub fn to_data_frame(table: &AggregateTable) -> anyhow::Result<DataFrame> {
    let mut columns = Vec::with_capacity(table.columns().len() + 1);
    columns.push(Column::new(LEVEL_COLUMN.into(), table.levels()));
    for (index, name) in table.columns().iter().enumerate() {
        let values = table
            .rows()
            .iter()
            .map(|row| row.values[index])
            .collect::<Vec<f64>>();
        columns.push(Column::new(name.as_str().into(), values));
    }

    Ok(DataFrame::new(columns)?)
}

/// Rebuild a table from a [DataFrame] in the layout produced by [to_data_frame].
///
/// Missing metric cells are read as 0, a missing level is an error.
pub fn from_data_frame(frame: &DataFrame) -> anyhow::Result<AggregateTable> {
    let levels = frame
        .column(LEVEL_COLUMN)?
        .as_materialized_series()
        .cast(&DataType::UInt32)?;

    let metric_columns = frame
        .get_column_names()
        .into_iter()
        .filter(|name| name.as_str() != LEVEL_COLUMN)
        .map(|name| name.to_string())
        .collect::<Vec<_>>();

    let metric_values = metric_columns
        .iter()
        .map(|name| -> anyhow::Result<Vec<f64>> {
            let series = frame
                .column(name)?
                .as_materialized_series()
                .cast(&DataType::Float64)?;
            Ok(series
                .f64()?
                .into_iter()
                .map(|value| value.unwrap_or(0.0))
                .collect())
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut table = AggregateTable::new();
    for name in metric_columns {
        table.add_column(name, 0.0)?;
    }
    for (row_index, level) in levels.u32()?.into_iter().enumerate() {
        let level = level.with_context(|| format!("Missing level in row {row_index}"))?;
        let row = table.push_row(level);
        for (column, values) in metric_values.iter().enumerate() {
            table.set(row, column, values[row_index])?;
        }
    }

    Ok(table)
}

/// Write the table as CSV with a header row.
pub fn write_csv(table: &AggregateTable, path: &Path) -> anyhow::Result<()> {
    let mut frame = to_data_frame(table)?;
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut frame)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Read a table written by [write_csv].
pub fn read_csv(path: &Path) -> anyhow::Result<AggregateTable> {
    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
        .with_context(|| format!("Failed to read {}", path.display()))?;
    from_data_frame(&frame)
}
