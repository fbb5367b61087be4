//! Fit command - learn replacement values and save the model.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use imputer::{CleaningMode, Imputer, ImputerParams, Parser, ParserConfig};

use crate::cli::delimiter_byte;

pub struct FitArgs {
    pub file: PathBuf,
    pub model: PathBuf,
    pub input_cols: Vec<String>,
    pub output_cols: Vec<String>,
    pub mode: Option<String>,
    pub custom_value: Option<String>,
    pub relative_error: Option<f64>,
    pub params: Option<PathBuf>,
    pub delimiter: Option<char>,
    pub overwrite: bool,
}

/// Merge a params file (if any) with command-line flags; flags win.
fn resolve_params(args: &FitArgs) -> Result<ImputerParams, Box<dyn std::error::Error>> {
    let mut params = match &args.params {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("Failed to read params '{}': {}", path.display(), e))?;
            serde_json::from_str::<ImputerParams>(&text)?
        }
        None => ImputerParams::default(),
    };

    if !args.input_cols.is_empty() {
        params.input_cols = args.input_cols.clone();
    }
    if !args.output_cols.is_empty() {
        params.output_cols = args.output_cols.clone();
    } else if params.output_cols.is_empty() {
        params.output_cols = params.input_cols.clone();
    }
    if let Some(mode) = &args.mode {
        params.mode = mode.parse::<CleaningMode>()?;
    }
    if let Some(value) = &args.custom_value {
        params.custom_value = Some(value.clone());
    }
    if let Some(relative_error) = args.relative_error {
        params.relative_error = relative_error;
    }

    Ok(params)
}

pub fn run(args: FitArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !args.file.exists() {
        return Err(format!("File not found: {}", args.file.display()).into());
    }

    let params = resolve_params(&args)?;
    let config = ParserConfig {
        delimiter: delimiter_byte(args.delimiter)?,
        ..ParserConfig::default()
    };

    println!(
        "{} {}",
        "Fitting".cyan().bold(),
        args.file.display().to_string().white()
    );
    let frame = Parser::with_config(config).parse_file(&args.file)?;

    let imputer = Imputer::new(params);
    let model = imputer.fit(&frame)?;
    model.save_to_dir(&args.model, args.overwrite)?;

    println!();
    println!(
        "{} ({} mode, {} rows)",
        "Replacement values:".yellow().bold(),
        imputer.params().mode,
        frame.row_count()
    );
    for ((input, output), (_, value)) in model.mapping().pairs().zip(model.surrogates()) {
        let target = if input == output {
            output.white().to_string()
        } else {
            format!("{} -> {}", input, output).white().to_string()
        };
        println!("  {}: {}", target, value.to_string().green());
    }

    println!();
    println!(
        "{} {}",
        "Saved model to".green().bold(),
        args.model.display()
    );

    Ok(())
}
