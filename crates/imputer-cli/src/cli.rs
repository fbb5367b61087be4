//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Imputer: fill missing values in CSV/TSV files
#[derive(Parser)]
#[command(name = "imputer")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fit an imputation model on a data file and save it
    Fit {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Directory to save the fitted model to
        #[arg(short, long, value_name = "DIR")]
        model: PathBuf,

        /// Input columns, comma separated
        #[arg(short, long = "input-cols", value_delimiter = ',')]
        input_cols: Vec<String>,

        /// Output columns, comma separated (default: clean input columns in place)
        #[arg(short, long = "output-cols", value_delimiter = ',')]
        output_cols: Vec<String>,

        /// Cleaning mode: mean, median, or custom
        #[arg(long)]
        mode: Option<String>,

        /// Literal used by custom mode
        #[arg(long)]
        custom_value: Option<String>,

        /// Relative error of the approximate median
        #[arg(long)]
        relative_error: Option<f64>,

        /// Load parameters from a JSON file; flags override its values
        #[arg(long, value_name = "PARAMS_JSON")]
        params: Option<PathBuf>,

        /// Field delimiter (default: auto-detect)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Replace an existing model directory
        #[arg(long)]
        overwrite: bool,
    },

    /// Apply a saved model to a data file
    Transform {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Directory of the saved model
        #[arg(short, long, value_name = "DIR")]
        model: PathBuf,

        /// Output path for imputed data (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Field delimiter (default: auto-detect for input, comma for output)
        #[arg(short, long)]
        delimiter: Option<char>,
    },

    /// Show the contents of a saved model
    Inspect {
        /// Directory of the saved model
        #[arg(value_name = "DIR")]
        model: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Convert a delimiter argument to the single byte the CSV reader expects.
pub fn delimiter_byte(delimiter: Option<char>) -> Result<Option<u8>, String> {
    match delimiter {
        None => Ok(None),
        Some(c) if c.is_ascii() => Ok(Some(c as u8)),
        Some(c) => Err(format!("Delimiter must be a single ASCII character, got '{}'", c)),
    }
}
