//! Remote search index adapter
//!
//! Pages documents out of an iSamples Solr select handler.

pub mod client;
mod index;
pub mod models;

pub use client::SolrClient;
pub use index::SearchIndex;
pub use models::{SelectPage, SelectRequest};
