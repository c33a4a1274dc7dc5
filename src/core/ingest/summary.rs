//! Ingestion run summary

use crate::core::state::Watermark;
use std::time::Duration;

/// Summary of one ingestion run
#[derive(Debug, Clone, Default)]
pub struct IngestSummary {
    /// Documents taken from the index
    pub processed: u64,

    /// New samples committed
    pub stored: u64,

    /// Documents whose identifier was already stored
    pub duplicates: u64,

    /// Documents dropped by the transformer
    pub rejected: u64,

    /// Records the store refused (no geohash)
    pub refused: u64,

    /// Locations created during the run
    pub locations_created: u64,

    /// Pages requested from the index
    pub pages_fetched: u64,

    /// Watermark the run started from
    pub watermark: Watermark,

    /// Duration of the run
    pub duration: Duration,
}

impl IngestSummary {
    /// Create an empty summary for a run starting at `watermark`
    pub fn new(watermark: Watermark) -> Self {
        Self {
            watermark,
            ..Default::default()
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Documents per second over the whole run
    pub fn throughput(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.processed as f64 / secs
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            processed = self.processed,
            stored = self.stored,
            duplicates = self.duplicates,
            rejected = self.rejected,
            refused = self.refused,
            locations_created = self.locations_created,
            pages = self.pages_fetched,
            watermark = %self.watermark,
            duration_secs = self.duration.as_secs(),
            throughput = format!("{:.1}/s", self.throughput()),
            "Ingestion completed"
        );

        if self.rejected > 0 {
            tracing::warn!(
                rejected = self.rejected,
                "Some documents were rejected and not stored"
            );
        }
    }
}
