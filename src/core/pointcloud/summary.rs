//! Export run summary

use std::time::Duration;

/// Summary of one point-cloud export
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportSummary {
    /// Year the samples were selected by
    pub target_year: i32,

    /// Data rows written after the header
    pub rows_written: u64,

    /// Rows read from the store but not written (no usable year)
    pub rows_skipped: u64,

    /// Distinct geohashes among written rows
    pub distinct_locations: u64,

    /// Largest number of points stacked on one location
    pub max_stack: u32,

    /// Duration of the export
    pub duration: Duration,
}

impl ExportSummary {
    pub fn new(target_year: i32) -> Self {
        Self {
            target_year,
            ..Default::default()
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            target_year = self.target_year,
            rows = self.rows_written,
            skipped = self.rows_skipped,
            locations = self.distinct_locations,
            max_stack = self.max_stack,
            duration_secs = self.duration.as_secs(),
            "Export completed"
        );
    }
}
