//! External system integrations for Icesium.
//!
//! - [`solr`] - the remote faceted search index (read-only HTTP select handler)
//! - [`sqlite`] - the local store of locations and samples
//!
//! # Design Pattern
//!
//! Adapters isolate third-party crates from the pipeline. The search index sits
//! behind the [`solr::SearchIndex`] trait so the pager can be driven by an
//! in-memory index in tests.
//!
//! ```rust,no_run
//! use icesium::adapters::solr::SolrClient;
//! use icesium::adapters::sqlite::SqliteStore;
//! use icesium::config::IcesiumConfig;
//!
//! # async fn example() -> icesium::domain::Result<()> {
//! let config = IcesiumConfig::default();
//! let index = SolrClient::new(&config.source)?;
//! let store = SqliteStore::open(&config.store).await?;
//! # Ok(())
//! # }
//! ```

pub mod solr;
pub mod sqlite;
