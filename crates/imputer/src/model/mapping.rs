//! Ordered input→output column pairs.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{ImputerError, Result};

/// Parallel input and output column lists; `output_cols[i]` receives the
/// imputed copy of `input_cols[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    input_cols: Vec<String>,
    output_cols: Vec<String>,
}

impl ColumnMapping {
    /// Validate and build a mapping.
    ///
    /// Both lists must be non-empty and of equal length, output names must
    /// be distinct, and a renamed output must not be read as the input of a
    /// later pair (the later pair would see the aliased copy, not the
    /// column its statistic was computed from).
    pub fn new(input_cols: Vec<String>, output_cols: Vec<String>) -> Result<Self> {
        if input_cols.is_empty() {
            return Err(ImputerError::Config("inputCols must not be empty".to_string()));
        }
        if input_cols.len() != output_cols.len() {
            return Err(ImputerError::Config(format!(
                "inputCols and outputCols must have the same length ({} vs {})",
                input_cols.len(),
                output_cols.len()
            )));
        }

        let mut seen = HashSet::new();
        if let Some(duplicate) = output_cols.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(ImputerError::Config(format!(
                "outputCols contains duplicate column '{}'",
                duplicate
            )));
        }

        for (i, (input, output)) in input_cols.iter().zip(&output_cols).enumerate() {
            if input != output && input_cols[i + 1..].contains(output) {
                return Err(ImputerError::Config(format!(
                    "output column '{}' is also the input of a later pair",
                    output
                )));
            }
        }

        Ok(Self {
            input_cols,
            output_cols,
        })
    }

    /// Input column names in order.
    pub fn input_cols(&self) -> &[String] {
        &self.input_cols
    }

    /// Output column names in order.
    pub fn output_cols(&self) -> &[String] {
        &self.output_cols
    }

    /// `(input, output)` pairs in order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.input_cols
            .iter()
            .map(String::as_str)
            .zip(self.output_cols.iter().map(String::as_str))
    }

    /// Pairs whose output differs from the input, as owned aliases.
    pub fn aliases(&self) -> Vec<(String, String)> {
        self.pairs()
            .filter(|(input, output)| input != output)
            .map(|(input, output)| (input.to_string(), output.to_string()))
            .collect()
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.input_cols.len()
    }

    /// Always false for a validated mapping.
    pub fn is_empty(&self) -> bool {
        self.input_cols.is_empty()
    }
}
