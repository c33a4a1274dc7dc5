//! Search index trait definition
//!
//! The pager talks to the remote index only through [`SearchIndex`], so tests
//! can substitute an in-memory index.

use super::models::{SelectPage, SelectRequest};
use crate::domain::Result;
use async_trait::async_trait;

/// A paged, filterable document index
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Fetch one page of documents
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status or an
    /// unparseable body. Callers treat every error as fatal for the run.
    async fn select(&self, request: &SelectRequest) -> Result<SelectPage>;

    /// Endpoint the index is reached at, for logging
    fn endpoint(&self) -> &str;
}
