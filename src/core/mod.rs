//! Core business logic for Icesium.
//!
//! # Modules
//!
//! - [`transform`] - raw document to canonical record, with memoized parsers
//! - [`fetch`] - lazy paginated document sequence over the search index
//! - [`state`] - watermark derived from the store for incremental sync
//! - [`ingest`] - the fetch → transform → store loop and its summary
//! - [`pointcloud`] - the point-cloud table exporter
//!
//! # Ingestion Workflow
//!
//! 1. **Load State**: read the latest persisted index-update time
//! 2. **Fetch**: page through the index, filtered to documents updated since then
//! 3. **Transform**: validate coordinates, geohash, pack vocabularies, parse times
//! 4. **Store**: create the location if new (committed at once), stage the sample
//! 5. **Commit**: one commit per stored sample
//! 6. **Report**: log the run summary
//!
//! # Example
//!
//! ```rust,no_run
//! use icesium::adapters::solr::SolrClient;
//! use icesium::adapters::sqlite::SqliteStore;
//! use icesium::config::IcesiumConfig;
//! use icesium::core::ingest::{IngestCoordinator, IngestRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = IcesiumConfig::default();
//! let index = SolrClient::new(&config.source)?;
//! let store = SqliteStore::open(&config.store).await?;
//!
//! let coordinator = IngestCoordinator::new(&config, &index, &store);
//! let summary = coordinator.run(&IngestRequest::from_config(&config)).await?;
//!
//! println!("Stored: {}", summary.stored);
//! println!("Rejected: {}", summary.rejected);
//! # Ok(())
//! # }
//! ```

pub mod fetch;
pub mod ingest;
pub mod pointcloud;
pub mod state;
pub mod transform;
