//! Csv command implementation
//!
//! Streams the point-cloud table to stdout. Logs go to stderr.

use crate::adapters::sqlite::SqliteStore;
use crate::config::IcesiumConfig;
use crate::core::pointcloud::PointCloudExporter;
use clap::Args;

/// Arguments for the csv command
#[derive(Args, Debug)]
pub struct CsvArgs {}

impl CsvArgs {
    /// Execute the csv command
    pub async fn execute(&self, config: &IcesiumConfig) -> anyhow::Result<i32> {
        tracing::info!("Starting csv command");

        let store = match SqliteStore::open(&config.store).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, path = %config.store.path, "Failed to open store");
                eprintln!("Failed to open store {}: {e}", config.store.path);
                return Ok(4);
            }
        };

        let exporter = PointCloudExporter::new(&config.export, &store);
        let result = exporter.export(std::io::stdout()).await;
        store.close().await;

        match result {
            Ok(summary) => {
                summary.log_summary();
                Ok(0)
            }
            Err(e) => {
                crate::log_error_with_context!(e, "Export failed");
                eprintln!("Export failed: {e}");
                Ok(5)
            }
        }
    }
}
