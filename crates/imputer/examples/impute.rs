//! Example: Fit an imputer on a data file and print the cleaned table.
//!
//! Usage:
//!   cargo run --example impute -- <file_path> <mode> <column>[,<column>...] [custom_value]
//!
//! Example:
//!   cargo run --example impute -- cohort.tsv median age,bmi

use std::env;
use std::io;
use std::path::Path;

use imputer::{CleaningMode, Dataset, Imputer, ImputerParams, Parser, write_csv};

fn main() -> imputer::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 4 {
        eprintln!("Usage: cargo run --example impute -- <file_path> <mode> <columns> [custom_value]");
        eprintln!("\nExample:");
        eprintln!("  cargo run --example impute -- cohort.tsv median age,bmi");
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    if !path.exists() {
        eprintln!("Error: File not found: {}", path.display());
        std::process::exit(1);
    }

    let mode: CleaningMode = args[2].parse()?;
    let columns: Vec<&str> = args[3].split(',').map(str::trim).collect();
    let mut params = ImputerParams::in_place(columns).with_mode(mode);
    if let Some(value) = args.get(4) {
        params = params.with_custom_value(value.clone());
    }

    let frame = Parser::new().parse_file(path)?;
    println!("## Schema");
    for field in &frame.schema().fields {
        println!(
            "  {:<20} {:<10} nulls={}",
            field.name,
            field.data_type,
            frame.null_count(&field.name).unwrap_or(0)
        );
    }
    println!();

    let (model, cleaned) = Imputer::new(params).fit_transform(&frame)?;

    println!("## Replacement Values ({})", mode);
    for (column, value) in model.surrogates() {
        println!("  {}: {}", column, value);
    }
    println!();

    println!("## Cleaned Data");
    write_csv(&cleaned, io::stdout().lock(), b',')?;

    Ok(())
}
