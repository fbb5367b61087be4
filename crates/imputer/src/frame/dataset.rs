//! Capability interface the imputer needs from a tabular engine.

use crate::error::Result;
use crate::model::ReplacementValues;
use crate::schema::Schema;

/// Narrow view of a columnar dataset engine.
///
/// Implementations may execute each operation across many partitions in
/// parallel; every call blocks until the engine has finished. Operations never
/// mutate the receiver and return a new dataset handle where applicable.
pub trait Dataset: Sized {
    /// Declared schema, in column order.
    fn schema(&self) -> &Schema;

    /// Exact mean of each named numeric column over its non-missing values,
    /// computed in a single aggregation pass. `None` for columns with no
    /// observed values.
    fn mean(&self, columns: &[&str]) -> Result<Vec<Option<f64>>>;

    /// Approximate quantile of each named numeric column from a single-pass,
    /// bounded-memory sketch. `relative_error` trades accuracy for memory.
    fn approx_quantile(
        &self,
        columns: &[&str],
        probability: f64,
        relative_error: f64,
    ) -> Result<Vec<Option<f64>>>;

    /// Fold `(source, alias)` pairs left to right: each alias becomes a copy
    /// of the current `source` column, replacing a same-named column in place
    /// or appending a new one. No column is dropped.
    fn project_columns(&self, aliases: &[(String, String)]) -> Result<Self>;

    /// Replace missing cells in each named column with its replacement value.
    /// Columns not named are passed through unchanged.
    fn fill_nulls(&self, values: &ReplacementValues) -> Result<Self>;
}
