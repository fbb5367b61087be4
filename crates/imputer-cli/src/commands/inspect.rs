//! Inspect command - show a saved model's metadata and replacement values.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use colored::Colorize;
use imputer::ImputationModel;
use imputer::persistence::read_metadata_from_dir;

pub fn run(model_dir: PathBuf, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let metadata = read_metadata_from_dir(&model_dir)?;
    let model = ImputationModel::load_from_dir(&model_dir)?;

    if json_output {
        let columns: Vec<_> = model
            .mapping()
            .pairs()
            .zip(model.surrogates())
            .map(|((input, output), (_, value))| {
                serde_json::json!({
                    "input": input,
                    "output": output,
                    "replacement": value,
                })
            })
            .collect();
        let summary = serde_json::json!({
            "uid": model.uid(),
            "className": metadata.class_name,
            "formatVersion": metadata.format_version,
            "timestamp": metadata.timestamp,
            "columns": columns,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let saved_at = DateTime::<Utc>::from_timestamp_millis(metadata.timestamp)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| metadata.timestamp.to_string());

    println!(
        "{} {}",
        "Model".cyan().bold(),
        model_dir.display().to_string().white()
    );
    println!();
    println!("  UID:     {}", model.uid().white());
    println!("  Class:   {}", metadata.class_name);
    println!("  Format:  v{}", metadata.format_version);
    println!("  Saved:   {}", saved_at);
    println!();

    println!("{}", "Columns:".yellow().bold());
    for ((input, output), (_, value)) in model.mapping().pairs().zip(model.surrogates()) {
        let arrow = if input == output {
            "(in place)".dimmed().to_string()
        } else {
            format!("-> {}", output)
        };
        println!(
            "  {} {} = {} {}",
            input.white().bold(),
            arrow,
            value.to_string().green(),
            format!("[{}]", value.kind()).dimmed()
        );
    }

    Ok(())
}
