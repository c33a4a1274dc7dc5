//! Get command implementation
//!
//! Fetches records from the search index into the local store.

use crate::adapters::solr::SolrClient;
use crate::adapters::sqlite::SqliteStore;
use crate::config::IcesiumConfig;
use crate::core::ingest::{IngestCoordinator, IngestRequest};
use clap::Args;

/// Arguments for the get command
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Query string [default: records with a sampling location]
    #[arg(short, long)]
    pub query: Option<String>,

    /// Maximum number of records to retrieve
    #[arg(short = 'x', long)]
    pub maxrecs: Option<u64>,

    /// Only count matching records (currently ignored)
    #[arg(short, long)]
    pub count: bool,
}

impl GetArgs {
    /// Build the ingestion request from the flags and configuration
    pub fn request(&self, config: &IcesiumConfig) -> IngestRequest {
        let mut request = IngestRequest::from_config(config);
        if let Some(query) = &self.query {
            request.query = query.clone();
        }
        if let Some(max) = self.maxrecs {
            request.max_records = max;
        }
        request
    }

    /// Execute the get command
    pub async fn execute(&self, config: &IcesiumConfig) -> anyhow::Result<i32> {
        tracing::info!("Starting get command");

        if self.count {
            tracing::debug!("Count-only flag is ignored, running a normal fetch");
        }

        let index = match SolrClient::new(&config.source) {
            Ok(c) => c,
            Err(e) => {
                crate::log_error_with_context!(e, "Failed to create search index client");
                eprintln!("Failed to initialize search index client: {e}");
                return Ok(2);
            }
        };

        let store = match SqliteStore::open(&config.store).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, path = %config.store.path, "Failed to open store");
                eprintln!("Failed to open store {}: {e}", config.store.path);
                return Ok(4);
            }
        };

        let request = self.request(config);
        let coordinator = IngestCoordinator::new(config, &index, &store);

        let result = coordinator.run(&request).await;
        store.close().await;

        let summary = match result {
            Ok(s) => s,
            Err(e) => {
                crate::log_error_with_context!(e, "Ingestion failed");
                eprintln!("Ingestion failed: {e}");
                return Ok(5);
            }
        };

        summary.log_summary();

        eprintln!();
        eprintln!("Ingest Summary:");
        eprintln!("  Watermark: {}", summary.watermark);
        eprintln!("  Processed: {}", summary.processed);
        eprintln!("  Stored: {}", summary.stored);
        eprintln!("  Duplicates: {}", summary.duplicates);
        eprintln!("  Rejected: {}", summary.rejected);
        eprintln!("  Locations Created: {}", summary.locations_created);
        eprintln!("  Duration: {:.2}s", summary.duration.as_secs_f64());

        Ok(0)
    }
}
