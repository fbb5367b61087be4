//! Transform command - apply a saved model to a data file.

use std::io;
use std::path::PathBuf;

use colored::Colorize;
use imputer::{ImputationModel, Parser, ParserConfig, write_csv, write_csv_file};
use tracing::debug;

use crate::cli::delimiter_byte;

pub fn run(
    file: PathBuf,
    model_dir: PathBuf,
    output: Option<PathBuf>,
    delimiter: Option<char>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let delimiter = delimiter_byte(delimiter)?;
    let model = ImputationModel::load_from_dir(&model_dir)?;
    debug!(model = %model_dir.display(), uid = %model.uid(), "loaded model");

    let config = ParserConfig {
        delimiter,
        ..ParserConfig::default()
    };
    let frame = Parser::with_config(config).parse_file(&file)?;

    let filled: usize = model
        .input_cols()
        .iter()
        .filter_map(|input| frame.null_count(input))
        .sum();
    let result = model.transform(&frame)?;

    let out_delimiter = delimiter.unwrap_or(b',');
    match &output {
        Some(path) => {
            write_csv_file(&result, path, out_delimiter)?;
            eprintln!(
                "{} {} missing values across {} columns",
                "Filled".green().bold(),
                filled.to_string().white().bold(),
                model.output_cols().len()
            );
            eprintln!("{} {}", "Wrote".green().bold(), path.display());
        }
        None => {
            write_csv(&result, io::stdout().lock(), out_delimiter)?;
            if verbose {
                eprintln!(
                    "{} {} missing values across {} columns",
                    "Filled".green().bold(),
                    filled,
                    model.output_cols().len()
                );
            }
        }
    }

    Ok(())
}
