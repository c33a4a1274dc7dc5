//! Incremental-sync watermark
//!
//! The watermark is the latest index-update timestamp already persisted in
//! the store. Scoping the next fetch to documents updated at or after it, in
//! ascending update order, lets a rerun pick up where the last one stopped.
//! Because the value comes from persisted rows and not from fetched ones, a
//! crash mid-run still yields a correct (if overlapping) resume point.

use crate::domain::record::format_index_timestamp;
use chrono::{DateTime, Utc};
use std::fmt;

/// Index field carrying the document update time
pub const INDEX_UPDATED_FIELD: &str = "indexUpdatedTime";

/// Watermark for one ingestion run
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use icesium::core::state::Watermark;
///
/// let watermark = Watermark::from(Some(Utc.with_ymd_and_hms(2023, 1, 5, 12, 0, 0).unwrap()));
/// assert_eq!(
///     watermark.filter_expression().as_deref(),
///     Some("indexUpdatedTime:[2023-01-05T12:00:00.000Z TO *]")
/// );
/// assert_eq!(watermark.sort_expression().as_deref(), Some("indexUpdatedTime asc"));
///
/// let first_run = Watermark::default();
/// assert!(first_run.filter_expression().is_none());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Watermark {
    since: Option<DateTime<Utc>>,
}

impl Watermark {
    /// Timestamp the next fetch starts from, if any
    pub fn since(&self) -> Option<DateTime<Utc>> {
        self.since
    }

    /// True when nothing has been persisted yet
    pub fn is_initial(&self) -> bool {
        self.since.is_none()
    }

    /// Range filter selecting documents updated at or after the watermark
    pub fn filter_expression(&self) -> Option<String> {
        self.since.map(|ts| {
            format!(
                "{INDEX_UPDATED_FIELD}:[{} TO *]",
                format_index_timestamp(&ts)
            )
        })
    }

    /// Ascending update-time sort, set together with the filter
    pub fn sort_expression(&self) -> Option<String> {
        self.since.map(|_| format!("{INDEX_UPDATED_FIELD} asc"))
    }
}

impl From<Option<DateTime<Utc>>> for Watermark {
    fn from(since: Option<DateTime<Utc>>) -> Self {
        Self { since }
    }
}

impl fmt::Display for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.since {
            Some(ts) => write!(f, "{}", format_index_timestamp(ts)),
            None => write!(f, "none"),
        }
    }
}
