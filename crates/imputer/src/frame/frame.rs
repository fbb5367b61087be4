//! In-memory columnar dataset with partition-parallel aggregation.

use std::collections::HashSet;
use std::ops::Range;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug;

use crate::error::{ImputerError, Result};
use crate::model::ReplacementValues;
use crate::schema::Schema;

use super::aggregate::{MeanAccumulator, QuantileSketch, digest_size};
use super::cell::Cell;
use super::column::Column;
use super::dataset::Dataset;

/// Default number of rows aggregated per partition.
pub const DEFAULT_PARTITION_ROWS: usize = 8192;

/// An in-memory table of named, typed columns.
#[derive(Debug, Clone)]
pub struct Frame {
    schema: Schema,
    columns: Vec<Arc<Vec<Cell>>>,
    row_count: usize,
    partition_rows: usize,
}

impl Frame {
    /// Build a frame from columns.
    ///
    /// Fails if column lengths differ, names repeat, or a cell does not match
    /// its column's declared type.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);
        let mut seen = HashSet::new();

        for column in &columns {
            if !seen.insert(column.name().to_string()) {
                return Err(ImputerError::Schema(format!(
                    "duplicate column name '{}'",
                    column.name()
                )));
            }
            if column.len() != row_count {
                return Err(ImputerError::Schema(format!(
                    "column '{}' has {} rows, expected {}",
                    column.name(),
                    column.len(),
                    row_count
                )));
            }
            if let Some((row, cell)) = column
                .cells()
                .iter()
                .enumerate()
                .find(|(_, cell)| !cell.conforms_to(column.data_type()))
            {
                return Err(ImputerError::Schema(format!(
                    "column '{}' is declared {} but row {} holds a {} value",
                    column.name(),
                    column.data_type(),
                    row,
                    cell.kind()
                )));
            }
        }

        let schema = Schema::with_fields(columns.iter().map(|c| c.field().clone()).collect());
        let columns = columns.iter().map(|c| Arc::clone(c.shared_cells())).collect();

        Ok(Self {
            schema,
            columns,
            row_count,
            partition_rows: DEFAULT_PARTITION_ROWS,
        })
    }

    /// Set the number of rows per aggregation partition (minimum 1).
    pub fn with_partition_rows(mut self, rows: usize) -> Self {
        self.partition_rows = rows.max(1);
        self
    }

    /// Rows per aggregation partition.
    pub fn partition_rows(&self) -> usize {
        self.partition_rows
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get a column by name. Storage is shared with the frame.
    pub fn column(&self, name: &str) -> Option<Column> {
        let idx = self.schema.index_of(name)?;
        Some(Column::from_shared(
            self.schema.fields[idx].clone(),
            Arc::clone(&self.columns[idx]),
        ))
    }

    /// All columns in order.
    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        self.schema
            .fields
            .iter()
            .zip(&self.columns)
            .map(|(field, cells)| Column::from_shared(field.clone(), Arc::clone(cells)))
    }

    /// Get a specific cell.
    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.schema.index_of(column)?;
        self.columns[idx].get(row)
    }

    /// Number of missing cells in a column.
    pub fn null_count(&self, column: &str) -> Option<usize> {
        let idx = self.schema.index_of(column)?;
        Some(self.columns[idx].iter().filter(|c| c.is_missing()).count())
    }

    /// Cells of each named column, requiring a numeric declared type.
    fn numeric_cells(&self, names: &[&str]) -> Result<Vec<&[Cell]>> {
        names
            .iter()
            .map(|name| {
                let idx = self
                    .schema
                    .index_of(name)
                    .ok_or_else(|| ImputerError::ColumnNotFound(name.to_string()))?;
                let data_type = self.schema.fields[idx].data_type;
                if !data_type.is_numeric() {
                    return Err(ImputerError::Schema(format!(
                        "column '{}' of type {} cannot be aggregated numerically",
                        name, data_type
                    )));
                }
                Ok(self.columns[idx].as_slice())
            })
            .collect()
    }

    /// Row ranges processed as independent partitions.
    fn partitions(&self) -> Vec<Range<usize>> {
        (0..self.row_count)
            .step_by(self.partition_rows)
            .map(|start| start..(start + self.partition_rows).min(self.row_count))
            .collect()
    }
}

impl PartialEq for Frame {
    /// Frames are equal when schema and cell contents match; partitioning is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.schema == other.schema && self.columns == other.columns
    }
}

impl Dataset for Frame {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn mean(&self, columns: &[&str]) -> Result<Vec<Option<f64>>> {
        let data = self.numeric_cells(columns)?;
        let partitions = self.partitions();
        debug!(columns = ?columns, partitions = partitions.len(), "aggregating means");

        let totals = partitions
            .into_par_iter()
            .map(|range| {
                data.iter()
                    .map(|cells| MeanAccumulator::from_cells(&cells[range.clone()]))
                    .collect::<Vec<_>>()
            })
            .reduce(
                || vec![MeanAccumulator::default(); data.len()],
                |left, right| left.into_iter().zip(right).map(|(a, b)| a.merge(b)).collect(),
            );

        Ok(totals.iter().map(MeanAccumulator::finish).collect())
    }

    fn approx_quantile(
        &self,
        columns: &[&str],
        probability: f64,
        relative_error: f64,
    ) -> Result<Vec<Option<f64>>> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(ImputerError::Config(format!(
                "quantile probability must be in [0, 1], got {}",
                probability
            )));
        }
        if !(relative_error > 0.0 && relative_error <= 1.0) {
            return Err(ImputerError::Config(format!(
                "relative error must be in (0, 1], got {}",
                relative_error
            )));
        }

        let data = self.numeric_cells(columns)?;
        let size = digest_size(relative_error);
        let partitions = self.partitions();
        debug!(columns = ?columns, partitions = partitions.len(), digest_size = size, "sketching quantiles");

        let sketches = partitions
            .into_par_iter()
            .map(|range| {
                data.iter()
                    .map(|cells| QuantileSketch::from_cells(&cells[range.clone()], size))
                    .collect::<Vec<_>>()
            })
            .reduce(
                || vec![QuantileSketch::new(size); data.len()],
                |left, right| left.into_iter().zip(right).map(|(a, b)| a.merge(b)).collect(),
            );

        Ok(sketches.iter().map(|s| s.quantile(probability)).collect())
    }

    fn project_columns(&self, aliases: &[(String, String)]) -> Result<Self> {
        let mut projected = self.clone();

        for (source, alias) in aliases {
            let idx = projected
                .schema
                .index_of(source)
                .ok_or_else(|| ImputerError::ColumnNotFound(source.clone()))?;
            let field = projected.schema.fields[idx].renamed(alias.as_str());
            let cells = Arc::clone(&projected.columns[idx]);

            match projected.schema.index_of(alias) {
                Some(target) => {
                    debug!(source = %source, alias = %alias, "replacing existing column");
                    projected.schema.fields[target] = field;
                    projected.columns[target] = cells;
                }
                None => {
                    debug!(source = %source, alias = %alias, "appending aliased column");
                    projected.schema.fields.push(field);
                    projected.columns.push(cells);
                }
            }
        }

        Ok(projected)
    }

    fn fill_nulls(&self, values: &ReplacementValues) -> Result<Self> {
        let mut filled = self.clone();

        for (name, value) in values {
            let idx = filled
                .schema
                .index_of(name)
                .ok_or_else(|| ImputerError::ColumnNotFound(name.clone()))?;
            let declared = filled.schema.fields[idx].data_type;
            let target = value.output_type(declared);
            let replacement = value.to_cell(name, target)?;

            let cells = &filled.columns[idx];
            let widen = target != declared;
            if !widen && !cells.iter().any(Cell::is_missing) {
                continue;
            }

            let rewritten: Vec<Cell> = cells
                .par_iter()
                .map(|cell| match cell {
                    c if c.is_missing() => replacement.clone(),
                    Cell::Int(v) if widen => Cell::Float(*v as f64),
                    c => c.clone(),
                })
                .collect();
            if widen {
                debug!(column = %name, from = %declared, to = %target, "widened column");
                filled.schema.fields[idx].data_type = target;
            }
            debug!(column = %name, value = %value, "filled missing cells");
            filled.columns[idx] = Arc::new(rewritten);
        }

        Ok(filled)
    }
}
