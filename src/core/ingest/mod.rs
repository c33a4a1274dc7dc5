//! Ingestion workflow

pub mod coordinator;
pub mod summary;

pub use coordinator::{IngestCoordinator, IngestRequest};
pub use summary::IngestSummary;
