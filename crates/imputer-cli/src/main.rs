//! Imputer CLI - fit, apply and inspect imputation models.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Fit {
            file,
            model,
            input_cols,
            output_cols,
            mode,
            custom_value,
            relative_error,
            params,
            delimiter,
            overwrite,
        } => commands::fit::run(commands::fit::FitArgs {
            file,
            model,
            input_cols,
            output_cols,
            mode,
            custom_value,
            relative_error,
            params,
            delimiter,
            overwrite,
        }),

        Commands::Transform {
            file,
            model,
            output,
            delimiter,
        } => commands::transform::run(file, model, output, delimiter, cli.verbose),

        Commands::Inspect { model, json } => commands::inspect::run(model, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
