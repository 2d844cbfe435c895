use build_sweep_report_model::{Level, MetricSample};
use thiserror::Error;

/// Name of the level column, always the first column of the table.
pub const LEVEL_COLUMN: &str = "level";

#[derive(Error, Debug, PartialEq)]
pub enum TableError {
    #[error("Column already exists: {0}")]
    DuplicateColumn(String),
    #[error("Column name '{0}' is reserved for the run level")]
    ReservedColumn(String),
    #[error("Unknown column: {0}")]
    UnknownColumn(String),
    #[error("Row {row} out of bounds for table with {rows} rows")]
    RowOutOfBounds { row: usize, rows: usize },
    #[error("Column {column} out of bounds for table with {columns} columns")]
    ColumnOutOfBounds { column: usize, columns: usize },
}

/// One run's row: its level and a value for every metric column of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
    pub level: Level,
    pub values: Vec<f64>,
}

/// A dense table of metrics per run whose columns grow as new categories are found.
///
/// Every row always holds a value for every metric column. Adding a column extends all existing
/// rows with its default and adding a row gives it 0 for every known column, so a 0 cell means
/// the run never reported that category.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregateTable {
    columns: Vec<String>,
    rows: Vec<AggregateRow>,
}

impl AggregateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The metric columns in the order they were added. The level column is not included.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All column names as written out, level column first.
    pub fn header(&self) -> Vec<&str> {
        std::iter::once(LEVEL_COLUMN)
            .chain(self.columns.iter().map(String::as_str))
            .collect()
    }

    pub fn rows(&self) -> &[AggregateRow] {
        &self.rows
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Add a metric column, setting `default` on every existing row. Returns the column index.
    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        default: f64,
    ) -> Result<usize, TableError> {
        let name = name.into();
        if name == LEVEL_COLUMN {
            return Err(TableError::ReservedColumn(name));
        }
        if self.column_index(&name).is_some() {
            return Err(TableError::DuplicateColumn(name));
        }
        for row in &mut self.rows {
            row.values.push(default);
        }
        self.columns.push(name);
        Ok(self.columns.len() - 1)
    }

    /// Add a row for `level` with 0 in every known column. Returns the row index.
    pub fn push_row(&mut self, level: Level) -> usize {
        self.rows.push(AggregateRow {
            level,
            values: vec![0.0; self.columns.len()],
        });
        self.rows.len() - 1
    }

    pub fn set(&mut self, row: usize, column: usize, value: f64) -> Result<(), TableError> {
        let rows = self.rows.len();
        let columns = self.columns.len();
        let cells = &mut self
            .rows
            .get_mut(row)
            .ok_or(TableError::RowOutOfBounds { row, rows })?
            .values;
        let cell = cells
            .get_mut(column)
            .ok_or(TableError::ColumnOutOfBounds { column, columns })?;
        *cell = value;
        Ok(())
    }

    /// Record a sample on `row`, adding its category as a new column if it hasn't been seen.
    ///
    /// A category already set on this row is overwritten, so the last sample wins.
    pub fn record(&mut self, row: usize, sample: &MetricSample) -> Result<(), TableError> {
        let column = match self.column_index(&sample.category) {
            Some(column) => column,
            None => self.add_column(sample.category.clone(), 0.0)?,
        };
        self.set(row, column, sample.value)
    }

    pub fn get(&self, row: usize, column: &str) -> Option<f64> {
        let column = self.column_index(column)?;
        self.rows.get(row).map(|r| r.values[column])
    }

    /// Every row's value for the named metric column, in row order.
    pub fn column_values(&self, name: &str) -> Result<Vec<f64>, TableError> {
        let column = self
            .column_index(name)
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))?;
        Ok(self.rows.iter().map(|r| r.values[column]).collect())
    }

    pub fn levels(&self) -> Vec<Level> {
        self.rows.iter().map(|r| r.level).collect()
    }
}
