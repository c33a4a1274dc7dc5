//! Ingestion coordinator
//!
//! Drives fetch → transform → store for one run. Every document is fully
//! handled, and its sample committed, before the next one is requested, so
//! the store never holds more than one open transaction.

use crate::adapters::solr::SearchIndex;
use crate::adapters::sqlite::{AddOutcome, SqliteStore};
use crate::config::IcesiumConfig;
use crate::core::fetch::{PagerSettings, RecordPager};
use crate::core::ingest::summary::IngestSummary;
use crate::core::state::StateManager;
use crate::core::transform::Transformer;
use crate::domain::Result;
use std::time::Instant;

/// What to ingest
#[derive(Debug, Clone, PartialEq)]
pub struct IngestRequest {
    pub query: String,
    pub max_records: u64,
}

impl IngestRequest {
    /// Request with the configured default query and cap
    pub fn from_config(config: &IcesiumConfig) -> Self {
        Self {
            query: config.ingest.default_query.clone(),
            max_records: config.ingest.max_records,
        }
    }
}

/// Ingestion coordinator
pub struct IngestCoordinator<'a, I: SearchIndex + ?Sized> {
    config: &'a IcesiumConfig,
    index: &'a I,
    store: &'a SqliteStore,
}

impl<'a, I: SearchIndex + ?Sized> IngestCoordinator<'a, I> {
    pub fn new(config: &'a IcesiumConfig, index: &'a I, store: &'a SqliteStore) -> Self {
        Self {
            config,
            index,
            store,
        }
    }

    /// Run one ingestion
    ///
    /// The fetch is scoped by the watermark read from the store. Rejected
    /// documents are logged and skipped.
    ///
    /// # Errors
    ///
    /// A failed page request or store operation ends the run with an error.
    /// Samples committed before the failure stay committed.
    pub async fn run(&self, request: &IngestRequest) -> Result<IngestSummary> {
        let start_time = Instant::now();

        let watermark = StateManager::new(self.store).load_watermark().await?;
        let mut summary = IngestSummary::new(watermark);

        tracing::info!(
            endpoint = self.index.endpoint(),
            query = %request.query,
            max_records = request.max_records,
            "Starting ingestion"
        );

        let settings = PagerSettings::new(
            &self.config.source,
            request.query.clone(),
            request.max_records,
            &watermark,
        );
        let mut pager = RecordPager::new(self.index, settings);
        let mut transformer = Transformer::new(self.config.ingest.cache_capacity);
        let progress_interval = self.config.ingest.progress_interval;

        while let Some(doc) = pager.next_document().await? {
            summary.processed += 1;

            match transformer.transform(&doc) {
                Ok(record) => match self.store.add_sample(&record).await? {
                    AddOutcome::Staged(tx) => {
                        if tx.location_created() {
                            summary.locations_created += 1;
                        }
                        tx.commit().await?;
                        summary.stored += 1;
                    }
                    AddOutcome::AlreadyPresent => summary.duplicates += 1,
                    AddOutcome::MissingGeohash => summary.refused += 1,
                },
                Err(rejection) => {
                    summary.rejected += 1;
                    tracing::warn!(
                        id = doc.id.as_deref().unwrap_or("<none>"),
                        reason = %rejection,
                        "Document rejected"
                    );
                }
            }

            if summary.processed % progress_interval == 0 {
                crate::log_progress!("ingest", summary.processed);
            }
        }

        summary.pages_fetched = pager.pages_fetched();
        let (hits, misses) = transformer.cache_stats();
        tracing::debug!(hits, misses, "Parser cache usage");

        Ok(summary.with_duration(start_time.elapsed()))
    }
}
