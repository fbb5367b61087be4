//! Output schema projection for input→output column mappings.

use crate::error::{ImputerError, Result};

use super::table::Schema;

/// Compute the schema produced by mapping each input column onto its output column.
///
/// Pairs are folded left to right over an index-addressable field list. When the
/// output name already exists its field is replaced by a copy of the input field
/// (renamed); otherwise the copy is appended. Later pairs see fields written by
/// earlier ones, so `a→b, b→c` leaves `c` with `a`'s type.
pub fn project_schema(schema: &Schema, input_cols: &[String], output_cols: &[String]) -> Result<Schema> {
    if input_cols.len() != output_cols.len() {
        return Err(ImputerError::Config(format!(
            "inputCols and outputCols must have the same length ({} vs {})",
            input_cols.len(),
            output_cols.len()
        )));
    }

    input_cols
        .iter()
        .zip(output_cols)
        .try_fold(schema.clone(), |mut acc, (input, output)| {
            let source = acc
                .field(input)
                .ok_or_else(|| ImputerError::ColumnNotFound(input.clone()))?
                .renamed(output.as_str());

            match acc.index_of(output) {
                Some(idx) => acc.fields[idx] = source,
                None => acc.fields.push(source),
            }
            Ok(acc)
        })
}
