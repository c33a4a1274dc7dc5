//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Icesium using clap.

pub mod commands;

use crate::config::{load_config, load_default_config, IcesiumConfig};
use crate::domain::{IcesiumError, Result};
use clap::{Parser, Subcommand};

/// Icesium - iSamples point-cloud ETL tool
#[derive(Parser, Debug)]
#[command(name = "icesium")]
#[command(version, about, long_about = None)]
#[command(author = "Icesium Contributors")]
pub struct Cli {
    /// Logging verbosity (DEBUG, INFO, WARNING, ERROR, FATAL)
    #[arg(short, long, env = "ICESIUM_VERBOSITY")]
    pub verbosity: Option<String>,

    /// Path to the local records store [default: records.sqlite]
    #[arg(short, long, value_name = "PATH")]
    pub records: Option<String>,

    /// Optional configuration file
    #[arg(long, env = "ICESIUM_CONFIG", value_name = "FILE")]
    pub config: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch records from the search index into the local store
    Get(commands::get::GetArgs),

    /// Write the stored samples of the target year as a point-cloud table to stdout
    Csv(commands::csv::CsvArgs),
}

impl Cli {
    /// Build the effective configuration
    ///
    /// Loads `--config` when given (otherwise defaults plus environment
    /// overrides), then applies the global flags on top.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be loaded or the
    /// result does not validate.
    pub fn effective_config(&self) -> Result<IcesiumConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => load_default_config()?,
        };

        if let Some(verbosity) = &self.verbosity {
            config.application.log_level = verbosity.clone();
        }
        if let Some(records) = &self.records {
            config.store.path = records.clone();
        }

        config
            .validate()
            .map_err(|e| IcesiumError::Configuration(format!("Invalid option: {e}")))?;
        Ok(config)
    }
}
