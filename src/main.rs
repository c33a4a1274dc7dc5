// Icesium - iSamples point-cloud ETL tool
// Copyright (c) 2025 Icesium Contributors
// Licensed under the MIT License

use clap::Parser;
use icesium::cli::{Cli, Commands};
use icesium::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match cli.effective_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            process::exit(2);
        }
    };

    let guard = match init_logging(&config.application.log_level, &config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(2);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        store = %config.store.path,
        "Icesium - iSamples point-cloud ETL tool"
    );

    let exit_code = match &cli.command {
        Commands::Get(args) => args.execute(&config).await,
        Commands::Csv(args) => args.execute(&config).await,
    }
    .unwrap_or_else(|e| {
        icesium::log_error_with_context!(e, "Command execution failed");
        eprintln!("Error: {e}");
        5
    });

    // process::exit skips destructors; flush file logs first
    drop(guard);
    process::exit(exit_code);
}
