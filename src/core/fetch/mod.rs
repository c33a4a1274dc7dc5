//! Resumable paginated fetcher
//!
//! [`RecordPager`] turns the page-oriented [`SearchIndex`] into a lazy,
//! finite sequence of raw documents. Pages are requested one at a time and
//! only when the previous page has been fully consumed.

use crate::adapters::solr::{SearchIndex, SelectRequest};
use crate::config::SourceConfig;
use crate::core::state::Watermark;
use crate::domain::{RawDocument, Result};
use std::collections::VecDeque;

/// Query parameters of one paging run
#[derive(Debug, Clone, PartialEq)]
pub struct PagerSettings {
    pub query: String,
    pub filter: Option<String>,
    pub sort: Option<String>,
    pub fields: Vec<String>,
    pub page_size: usize,
    pub start: u64,
    pub max_records: u64,
}

impl PagerSettings {
    /// Settings for `query`, scoped by `watermark`
    pub fn new(
        source: &SourceConfig,
        query: impl Into<String>,
        max_records: u64,
        watermark: &Watermark,
    ) -> Self {
        Self {
            query: query.into(),
            filter: watermark.filter_expression(),
            sort: watermark.sort_expression(),
            fields: source.fields.clone(),
            page_size: source.page_size,
            start: 0,
            max_records,
        }
    }
}

/// Lazy document sequence over a search index
///
/// The sequence ends when the index returns an empty page, when the last
/// page reported by `numFound` has been consumed, or once `max_records`
/// documents have been yielded. The offset advances by the page size after
/// every fetched page. Fetch errors are returned as-is and are not retried.
pub struct RecordPager<'a, I: SearchIndex + ?Sized> {
    index: &'a I,
    request: SelectRequest,
    max_records: u64,
    buffer: VecDeque<RawDocument>,
    yielded: u64,
    pages: u64,
    exhausted: bool,
    capped: bool,
}

impl<'a, I: SearchIndex + ?Sized> RecordPager<'a, I> {
    pub fn new(index: &'a I, settings: PagerSettings) -> Self {
        Self {
            index,
            request: SelectRequest {
                query: settings.query,
                filter: settings.filter,
                sort: settings.sort,
                fields: settings.fields,
                start: settings.start,
                rows: settings.page_size,
            },
            max_records: settings.max_records,
            buffer: VecDeque::new(),
            yielded: 0,
            pages: 0,
            exhausted: false,
            capped: false,
        }
    }

    /// Next document, or `None` when the sequence has ended
    ///
    /// # Errors
    ///
    /// Returns the index error of a failed page request.
    pub async fn next_document(&mut self) -> Result<Option<RawDocument>> {
        loop {
            if self.yielded >= self.max_records {
                if !self.capped {
                    self.capped = true;
                    tracing::info!(
                        max_records = self.max_records,
                        "Maximum record count reached"
                    );
                }
                return Ok(None);
            }

            if let Some(doc) = self.buffer.pop_front() {
                self.yielded += 1;
                return Ok(Some(doc));
            }

            if self.exhausted {
                return Ok(None);
            }

            self.fetch_page().await?;
        }
    }

    async fn fetch_page(&mut self) -> Result<()> {
        let page = self.index.select(&self.request).await?;
        self.pages += 1;

        let count = page.docs.len() as u64;
        tracing::info!(
            start = self.request.start,
            count,
            num_found = page.num_found,
            "Fetched page"
        );

        if count == 0 || self.request.start + count >= page.num_found {
            self.exhausted = true;
        }

        self.request.start += self.request.rows as u64;
        self.buffer.extend(page.docs);
        Ok(())
    }

    /// Documents yielded so far
    pub fn yielded(&self) -> u64 {
        self.yielded
    }

    /// Pages requested so far
    pub fn pages_fetched(&self) -> u64 {
        self.pages
    }
}
