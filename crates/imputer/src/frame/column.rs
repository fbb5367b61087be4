//! Named, typed column of cells.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use crate::schema::{DataType, Field};

use super::cell::Cell;

/// A column: its field plus shared cell storage.
///
/// Cells sit behind an `Arc`, so columns passed through a projection or fill
/// share storage with their source.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    field: Field,
    cells: Arc<Vec<Cell>>,
}

impl Column {
    /// Create a column from a field and its cells.
    pub fn new(field: Field, cells: Vec<Cell>) -> Self {
        Self {
            field,
            cells: Arc::new(cells),
        }
    }

    pub(crate) fn from_shared(field: Field, cells: Arc<Vec<Cell>>) -> Self {
        Self { field, cells }
    }

    /// 32-bit integer column.
    pub fn integer(name: impl Into<String>, values: impl IntoIterator<Item = Option<i32>>) -> Self {
        Self::typed(name, DataType::Integer, values, |v| Cell::Int(i64::from(v)))
    }

    /// 64-bit integer column.
    pub fn long(name: impl Into<String>, values: impl IntoIterator<Item = Option<i64>>) -> Self {
        Self::typed(name, DataType::Long, values, Cell::Int)
    }

    /// Single-precision column.
    pub fn float(name: impl Into<String>, values: impl IntoIterator<Item = Option<f32>>) -> Self {
        Self::typed(name, DataType::Float, values, |v| Cell::Float(f64::from(v)))
    }

    /// Double-precision column.
    pub fn double(name: impl Into<String>, values: impl IntoIterator<Item = Option<f64>>) -> Self {
        Self::typed(name, DataType::Double, values, Cell::Float)
    }

    /// String column.
    pub fn string<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = Option<S>>,
    ) -> Self {
        Self::typed(name, DataType::String, values, |v| Cell::Text(v.into()))
    }

    /// Boolean column.
    pub fn boolean(name: impl Into<String>, values: impl IntoIterator<Item = Option<bool>>) -> Self {
        Self::typed(name, DataType::Boolean, values, Cell::Bool)
    }

    /// Date column.
    pub fn date(name: impl Into<String>, values: impl IntoIterator<Item = Option<NaiveDate>>) -> Self {
        Self::typed(name, DataType::Date, values, Cell::Date)
    }

    /// Timestamp column.
    pub fn timestamp(
        name: impl Into<String>,
        values: impl IntoIterator<Item = Option<NaiveDateTime>>,
    ) -> Self {
        Self::typed(name, DataType::Timestamp, values, Cell::Timestamp)
    }

    fn typed<T>(
        name: impl Into<String>,
        data_type: DataType,
        values: impl IntoIterator<Item = Option<T>>,
        wrap: impl Fn(T) -> Cell,
    ) -> Self {
        let cells = values
            .into_iter()
            .map(|v| v.map(&wrap).unwrap_or(Cell::Null))
            .collect();
        Self::new(Field::new(name, data_type), cells)
    }

    /// Column field.
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.field.name
    }

    /// Declared data type.
    pub fn data_type(&self) -> DataType {
        self.field.data_type
    }

    /// Cell values in row order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn shared_cells(&self) -> &Arc<Vec<Cell>> {
        &self.cells
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of missing cells (null or NaN).
    pub fn null_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_missing()).count()
    }

    /// Numeric view of every cell, missing and non-numeric as `None`.
    pub fn to_f64_vec(&self) -> Vec<Option<f64>> {
        self.cells.iter().map(Cell::as_f64).collect()
    }
}
