// Icesium - iSamples point-cloud ETL tool
// Copyright (c) 2025 Icesium Contributors
// Licensed under the MIT License

//! # Icesium - iSamples sample locations to point clouds
//!
//! Icesium pulls sample records out of an iSamples Solr index, keeps them in a
//! local SQLite file deduplicated by location, and exports them as a
//! space-delimited point table ready for point-cloud tools.
//!
//! ## Overview
//!
//! - **Extracting** documents page by page from the index select handler
//! - **Transforming** each into a compact record: geohash, packed vocabulary
//!   word, source code, production year and day
//! - **Loading** into two keyed tables, locations by geohash and samples by
//!   identifier, with one commit per sample
//! - **Resuming** from the latest persisted index-update time on the next run
//! - **Exporting** one year of samples with per-location vertical jitter
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (transform, fetch, state, ingest, pointcloud)
//! - [`adapters`] - External integrations (Solr, SQLite)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use icesium::adapters::solr::SolrClient;
//! use icesium::adapters::sqlite::SqliteStore;
//! use icesium::config::IcesiumConfig;
//! use icesium::core::ingest::{IngestCoordinator, IngestRequest};
//! use icesium::core::pointcloud::PointCloudExporter;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = IcesiumConfig::default();
//!     let index = SolrClient::new(&config.source)?;
//!     let store = SqliteStore::open(&config.store).await?;
//!
//!     let summary = IngestCoordinator::new(&config, &index, &store)
//!         .run(&IngestRequest::from_config(&config))
//!         .await?;
//!     println!("Stored {} samples", summary.stored);
//!
//!     PointCloudExporter::new(&config.export, &store)
//!         .export(std::io::stdout())
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`domain::Result`], whose error type is
//! [`domain::IcesiumError`]. Per-document problems are not errors: rejected
//! documents are logged and skipped.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
